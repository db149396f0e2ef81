use std::collections::BTreeMap;

use log::{debug, trace, warn};
use wf_format::Material;

/// Reasons a single `.mtl` directive is skipped. None of them abort the scan.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DirectiveError {
    #[error("expected {expected} values, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("no `newmtl` before this directive")]
    NoCurrentMaterial,
}

// parses wavefront mtl (http://paulbourke.net/dataformats/mtl/)
// malformed directives are reported and skipped as a whole, the scan always finishes
pub fn parse(source: &str) -> BTreeMap<String, Material> {
    let mut parser = MtlParser::default();

    for (number, line) in source.lines().enumerate() {
        let mut words = line.split_whitespace();
        let token = match words.next() {
            Some(token) => token,
            None => continue,
        };
        let values: Vec<&str> = words.collect();

        trace!("Parsing: \"{}\"", line);
        if let Err(err) = parser.parse_token(token, &values) {
            warn!("Incorrect `{}` value in line {}: {}", token, number + 1, err);
        }
    }

    parser.materials
}

#[derive(Debug, Default)]
struct MtlParser {
    materials: BTreeMap<String, Material>,
    current: Option<String>,
}

impl MtlParser {
    fn parse_token(&mut self, token: &str, values: &[&str]) -> Result<(), DirectiveError> {
        match token {
            "newmtl" => {
                // properties after a rejected `newmtl` must not land on the previous material
                self.current = None;
                let name = *values.first().ok_or(DirectiveError::Arity {
                    expected: 1,
                    found: 0,
                })?;
                if values.len() > 1 {
                    debug!("Ignoring trailing tokens of material \"{}\"", name);
                }
                if self.materials.contains_key(name) {
                    warn!("Material \"{}\" is defined twice, keeping the last one", name);
                }
                self.materials.insert(name.into(), Material::new(name));
                self.current = Some(name.into());
            }
            // colors
            "Ka" => {
                let color = parse_color(values)?;
                self.current_material()?.ambient_color = color;
            }
            "Kd" => {
                let color = parse_color(values)?;
                self.current_material()?.diffuse_color = color;
            }
            "Ks" => {
                let color = parse_color(values)?;
                self.current_material()?.specular_color = color;
            }
            "Ns" => {
                let [exponent] = parse_floats::<1>(values)?;
                self.current_material()?.specular_exponent = exponent;
            }
            // dissolve
            "d" => {
                let [alpha] = parse_floats::<1>(values)?;
                self.current_material()?.alpha = alpha;
            }
            // textures
            "map_Ka" => {
                let [path] = expect_values::<1>(values)?;
                self.current_material()?.ambient_texture = Some(path.into());
            }
            "map_Kd" => {
                let [path] = expect_values::<1>(values)?;
                self.current_material()?.diffuse_texture = Some(path.into());
            }
            "map_Bump" | "bump" | "norm" => {
                let [path] = expect_values::<1>(values)?;
                self.current_material()?.normal_texture = Some(path.into());
            }
            comment if comment.starts_with('#') => {}
            _ => debug!("Skipping unsupported material token \"{}\"", token),
        }

        Ok(())
    }

    fn current_material(&mut self) -> Result<&mut Material, DirectiveError> {
        let name = self.current.as_ref().ok_or(DirectiveError::NoCurrentMaterial)?;
        self.materials
            .get_mut(name)
            .ok_or(DirectiveError::NoCurrentMaterial)
    }
}

fn expect_values<'a, const N: usize>(values: &[&'a str]) -> Result<[&'a str; N], DirectiveError> {
    <[&str; N]>::try_from(values).map_err(|_| DirectiveError::Arity {
        expected: N,
        found: values.len(),
    })
}

fn parse_floats<const N: usize>(values: &[&str]) -> Result<[f32; N], DirectiveError> {
    let values = expect_values::<N>(values)?;
    let mut numbers = [0.0; N];
    for (number, value) in numbers.iter_mut().zip(values) {
        *number = value
            .parse()
            .map_err(|_| DirectiveError::NotANumber(value.into()))?;
    }
    Ok(numbers)
}

fn parse_color(values: &[&str]) -> Result<[f32; 3], DirectiveError> {
    parse_floats::<3>(values)
}
