use std::num;

use log::{debug, trace, warn};

use super::{builder::ObjMeshBuilder, face, meta::ObjMeta};

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
    #[error("Failed to parse float.")]
    ParseFloat(#[from] num::ParseFloatError),
    #[error("Failed to parse face index `{0}`.")]
    ParseFace(String),
    #[error("Unsupported face index `{0}`, only absolute 1-based indices are allowed.")]
    UnsupportedIndex(String),
    #[error("Face references {attribute} {index}, but only {count} are declared.")]
    DanglingReference {
        attribute: &'static str,
        index: usize,
        count: usize,
    },
}

// parses wavefront obj (https://en.wikipedia.org/wiki/Wavefront_.obj_file)
// directives outside of geometry, faces and material references are skipped
pub(crate) fn parse(source: &str, name: &str, meta: ObjMeta) -> Result<ObjMeshBuilder, ParserError> {
    let mut builder = ObjMeshBuilder::new(name, meta);

    for (number, line) in source.lines().enumerate() {
        let mut words = line.split_whitespace();
        let token = match words.next() {
            Some(token) => token,
            None => continue,
        };
        let values: Vec<&str> = words.collect();

        trace!("Parsing: \"{}\"", line);
        parse_token(token, &values, number + 1, &mut builder)?;
    }

    Ok(builder)
}

fn parse_token(
    token: &str,
    values: &[&str],
    line: usize,
    builder: &mut ObjMeshBuilder,
) -> Result<(), ParserError> {
    match token {
        // vertex
        "v" => match parse_vec3(values)? {
            Some(position) => builder.push_vertex(position),
            None => malformed(token, line),
        },
        // texture coordinates
        "vt" => match parse_uv(values)? {
            Some(uv) => builder.push_uv(uv),
            None => malformed(token, line),
        },
        // vertex normals
        "vn" => match parse_vec3(values)? {
            Some(normal) => builder.push_normal(normal),
            None => malformed(token, line),
        },
        "f" => {
            let face = face::parse_face(values)?;
            if face.face_i.len() < 3 {
                malformed(token, line);
            } else {
                builder.push_face(&face)?;
            }
        }
        // material
        "usemtl" => match values.first() {
            Some(material) => builder.use_material(material),
            None => malformed(token, line),
        },
        "mtllib" => match values.first() {
            Some(library) => builder.set_material_library(library),
            None => malformed(token, line),
        },
        // name, group and smoothing groups do not affect the assembled meshes
        "o" | "g" | "s" => debug!("Ignoring `{}` in line {}", token, line),
        comment if comment.starts_with('#') => trace!("Comment in line {}", line),
        _ => debug!("Skipping unknown token \"{}\" in line {}", token, line),
    };

    Ok(())
}

fn malformed(token: &str, line: usize) {
    warn!("Incorrect `{}` directive in line {}. Ignoring.", token, line);
}

// extra components like `w` or vertex colors are dropped
fn parse_vec3(values: &[&str]) -> Result<Option<[f32; 3]>, num::ParseFloatError> {
    let numbers = parse_numbers(values)?;
    Ok(match numbers[..] {
        [x, y, z, ..] => Some([x, y, z]),
        _ => None,
    })
}

fn parse_uv(values: &[&str]) -> Result<Option<[f32; 2]>, num::ParseFloatError> {
    let numbers = parse_numbers(values)?;
    Ok(match numbers[..] {
        [u, v, ..] => Some([u, v]),
        _ => None,
    })
}

pub(crate) fn parse_numbers(values: &[&str]) -> Result<Vec<f32>, num::ParseFloatError> {
    values.iter().map(|x| x.parse()).collect::<Result<_, _>>()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_token() -> Result<(), ParserError> {
        let mut builder = ObjMeshBuilder::new("test", ObjMeta::default());

        parse_token("o", &["foo", "bar"], 1, &mut builder)?;
        parse_token("v", &["1", "2", "3"], 2, &mut builder)?;
        parse_token("v", &["4", "5", "6", "1"], 3, &mut builder)?;
        parse_token("vt", &["0.5", "1"], 4, &mut builder)?;
        parse_token("vn", &["0", "0", "1"], 5, &mut builder)?;
        parse_token("g", &["new", "group"], 6, &mut builder)?;

        assert_eq!(builder.geometry.positions, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(builder.geometry.uvs, vec![[0.5, 1.0]]);
        assert_eq!(builder.geometry.normals, vec![[0.0, 0.0, 1.0]]);

        Ok(())
    }

    #[test]
    fn test_parse_vertex() -> Result<(), ParserError> {
        assert_eq!(parse_vec3(&["1", "1", "1", "1", "2", "3"])?, Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_vec3(&["1", "1"])?, None);
        assert!(parse_vec3(&["1", "x", "1"]).is_err());

        Ok(())
    }

    #[test]
    fn test_malformed_directives_are_skipped() -> Result<(), ParserError> {
        let builder = parse("v 1 2\nvt 1\nf 1 2\nusemtl\nv 0 0 0\n", "test", ObjMeta::default())?;

        assert_eq!(builder.geometry.positions, vec![[0.0, 0.0, 0.0]]);
        assert!(builder.geometry.uvs.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_directives_are_skipped() -> Result<(), ParserError> {
        let source = "# comment\n#another\n\n   \no cube\ng side\ns off\nvp 1 2\nl 1 2\nv 1 2 3\n";
        let builder = parse(source, "test", ObjMeta::default())?;

        assert_eq!(builder.geometry.positions, vec![[1.0, 2.0, 3.0]]);
        Ok(())
    }

    #[test]
    fn test_dangling_face_reference() {
        let result = parse("v 0 0 0\nv 1 0 0\nf 1 2 3\n", "test", ObjMeta::default());

        assert!(matches!(
            result,
            Err(ParserError::DanglingReference {
                attribute: "position",
                index: 3,
                count: 2
            })
        ));
    }

    #[test]
    fn test_relative_index_fails() {
        let result = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n", "test", ObjMeta::default());

        assert!(matches!(result, Err(ParserError::UnsupportedIndex(_))));
    }
}
