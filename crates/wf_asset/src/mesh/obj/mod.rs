mod builder;
mod face;
mod geometry;
mod meta;
mod parser;

use log::info;
use std::path::Path;

use crate::{config::ConfigError, utils};

pub use builder::ObjOutput;
pub use meta::ObjMeta;
pub use parser::ParserError;

/// Assembles a wavefront `.obj` source into per-material meshes.
///
/// `name` prefixes the mesh names (`<name>_0`, `<name>_1`, ...).
pub fn parse(source: &str, name: &str, meta: ObjMeta) -> Result<ObjOutput, ParserError> {
    Ok(parser::parse(source, name, meta)?.build())
}

/// Parse meta from file called `file.toml` or alternativley from folder scoped meta file named `obj.toml` or else use default meta
pub fn parse_meta(path: &Path) -> Result<ObjMeta, ConfigError> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let meta_file =
        utils::file_name(path).ok_or_else(|| ConfigError::InvalidPath(path.to_owned()))?;

    let path = utils::combine_path(dir, meta_file, "toml");
    if path.is_file() {
        info!("Using meta file `{}`", path.display());
        return ObjMeta::parse(&path);
    }

    // check if folder scoped meta exists
    let path = utils::combine_path(dir, "obj", "toml");
    if path.is_file() {
        info!("Using folder meta file `{}`", path.display());
        return ObjMeta::parse(&path);
    }

    Ok(ObjMeta::default())
}

#[cfg(test)]
mod test {
    use super::*;
    use wf_format::DEFAULT_MATERIAL_NAME;

    const CUBE: &str = "\
v -1 -1  1
v  1 -1  1
v  1  1  1
v -1  1  1
v -1 -1 -1
v  1 -1 -1
v  1  1 -1
v -1  1 -1
f 1 2 3 4
f 6 5 8 7
f 5 1 4 8
f 2 6 7 3
f 4 3 7 8
f 5 6 2 1
";

    #[test]
    fn test_cube_single_material() -> Result<(), ParserError> {
        let output = parse(CUBE, "cube", ObjMeta::default())?;

        assert_eq!(output.meshes.len(), 1);
        assert_eq!(output.meshes[0].triangle_count(), 12);
        assert_eq!(output.meshes[0].indices, (0..36).collect::<Vec<u32>>());
        assert_eq!(output.meshes[0].material_name.as_deref(), Some(DEFAULT_MATERIAL_NAME));
        Ok(())
    }

    #[test]
    fn test_cube_material_switch() -> Result<(), ParserError> {
        let source = CUBE
            .replace("f 1 2 3 4", "mtllib cube.mtl\nusemtl red\nf 1 2 3 4")
            .replace("f 2 6 7 3", "usemtl blue\nf 2 6 7 3");
        let output = parse(&source, "cube", ObjMeta::default())?;

        assert_eq!(output.material_library.as_deref(), Some("cube.mtl"));
        assert_eq!(output.meshes.len(), 2);
        assert_eq!(output.meshes[0].triangle_count(), 6);
        assert_eq!(output.meshes[1].triangle_count(), 6);
        assert_eq!(output.meshes[1].indices[0], 0);
        assert_eq!(output.meshes[0].material_name.as_deref(), Some("red"));
        assert_eq!(output.meshes[1].material_name.as_deref(), Some("blue"));
        assert!(output.meshes.iter().all(|mesh| mesh.validate().is_ok()));
        Ok(())
    }
}
