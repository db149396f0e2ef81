pub mod obj;
pub mod tangent;
