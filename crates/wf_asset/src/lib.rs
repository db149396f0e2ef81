pub mod config;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod resources;
pub mod utils;

pub use config::{AssetConfig, AssetPaths};
pub use loader::{load_model, LoadContext, LoadError};
pub use resources::{FsSource, MemorySource, ResourceManager, ResourceSource};
