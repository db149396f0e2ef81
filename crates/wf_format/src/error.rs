use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, FormatError>;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Serialization Error: {0}")]
    SerializationError(#[from] Box<bincode::ErrorKind>),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Mesh `{mesh}` has {expected} vertices but {found} {attribute}")]
    MismatchedAttributes {
        mesh: String,
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Mesh `{mesh}` references vertex {index} but only has {count} vertices")]
    IndexOutOfRange { mesh: String, index: u32, count: usize },
    #[error("Mesh `{mesh}` uses unknown material `{material}`")]
    UnresolvedMaterial { mesh: String, material: String },
}
