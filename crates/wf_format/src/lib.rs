pub mod error;
pub mod material;
pub mod mesh;
pub mod model;

pub use error::{FormatError, Result};
pub use material::{Material, DEFAULT_MATERIAL_NAME};
pub use mesh::{Mesh, RenderHandle};
pub use model::Model;
