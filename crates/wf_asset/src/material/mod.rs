pub mod mtl;
