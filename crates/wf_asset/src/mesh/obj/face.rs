use super::parser::ParserError;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct ObjFaceIndex {
    pub(crate) vert_i: usize,
    pub(crate) uv_i: Option<usize>,
    pub(crate) normal_i: Option<usize>,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct ObjFace {
    pub(crate) face_i: Vec<ObjFaceIndex>,
}

impl ObjFace {
    /// Fan triangulation around the first corner, valid for convex polygons.
    pub(crate) fn triangles(&self) -> impl Iterator<Item = [&ObjFaceIndex; 3]> + '_ {
        fan(self.face_i.len()).map(move |[a, b, c]| [&self.face_i[a], &self.face_i[b], &self.face_i[c]])
    }
}

/// Corner triples of the fan over a `corners`-sided polygon; `corners - 2` triangles, none below three corners.
pub(crate) fn fan(corners: usize) -> impl Iterator<Item = [usize; 3]> {
    (2..corners.max(2)).map(|i| [0, i - 1, i])
}

// parses face indexes seperated by whitespace, which are itself seperated by slashes
pub(crate) fn parse_face(values: &[&str]) -> Result<ObjFace, ParserError> {
    let face_i = values
        .iter()
        .map(|value| parse_face_index(value))
        .collect::<Result<_, _>>()?;

    Ok(ObjFace { face_i })
}

// parses a single `pos[/[uv][/normal]]` reference
fn parse_face_index(value: &str) -> Result<ObjFaceIndex, ParserError> {
    let triplet = parse_triplet(value)?;

    Ok(ObjFaceIndex {
        vert_i: triplet[0].ok_or_else(|| ParserError::ParseFace(value.into()))?,
        uv_i: triplet[1],
        normal_i: triplet[2],
    })
}

// parse a triplet seperated by slashes, empty components are `None`
fn parse_triplet(value: &str) -> Result<[Option<usize>; 3], ParserError> {
    let mut ret = [None; 3];
    let mut components = value.split('/');

    for (a, b) in ret.iter_mut().zip(components.by_ref()) {
        *a = if b.is_empty() {
            None
        } else {
            Some(parse_index(b, value)?)
        }
    }

    if components.next().is_some() {
        return Err(ParserError::ParseFace(value.into()));
    }

    Ok(ret)
}

// only absolute, 1-based indices are supported
fn parse_index(component: &str, value: &str) -> Result<usize, ParserError> {
    let index: i64 = component
        .parse()
        .map_err(|_| ParserError::ParseFace(value.into()))?;

    if index < 1 {
        return Err(ParserError::UnsupportedIndex(value.into()));
    }

    usize::try_from(index).map_err(|_| ParserError::UnsupportedIndex(value.into()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_face() -> Result<(), ParserError> {
        assert_eq!(
            parse_face(&["1", "2/2", "3/2/1", "5//2"])?,
            ObjFace {
                face_i: vec![
                    ObjFaceIndex {
                        vert_i: 1,
                        ..ObjFaceIndex::default()
                    },
                    ObjFaceIndex {
                        vert_i: 2,
                        uv_i: Some(2),
                        ..ObjFaceIndex::default()
                    },
                    ObjFaceIndex {
                        vert_i: 3,
                        uv_i: Some(2),
                        normal_i: Some(1),
                    },
                    ObjFaceIndex {
                        vert_i: 5,
                        normal_i: Some(2),
                        ..ObjFaceIndex::default()
                    }
                ]
            }
        );
        Ok(())
    }

    #[test]
    fn test_parse_triplet() -> Result<(), ParserError> {
        assert_eq!(parse_triplet("1")?, [Some(1), None, None]);
        assert_eq!(parse_triplet("1/3")?, [Some(1), Some(3), None]);
        assert_eq!(parse_triplet("1/2/3")?, [Some(1), Some(2), Some(3)]);
        assert_eq!(parse_triplet("1//3")?, [Some(1), None, Some(3)]);

        Ok(())
    }

    #[test]
    fn test_parse_triplet_rejects_relative_and_zero() {
        assert!(matches!(parse_triplet("-1/2/3"), Err(ParserError::UnsupportedIndex(_))));
        assert!(matches!(parse_triplet("1/-1"), Err(ParserError::UnsupportedIndex(_))));
        assert!(matches!(parse_triplet("0"), Err(ParserError::UnsupportedIndex(_))));
    }

    #[test]
    fn test_parse_face_garbage() {
        assert!(matches!(parse_face(&["1/a"]), Err(ParserError::ParseFace(_))));
        assert!(matches!(parse_face(&["/2/3"]), Err(ParserError::ParseFace(_))));
        assert!(matches!(parse_face(&["1/2/3/4"]), Err(ParserError::ParseFace(_))));
    }

    #[test]
    fn test_fan_triangle_count() {
        for corners in 3..12 {
            let triangles: Vec<_> = fan(corners).collect();
            assert_eq!(triangles.len(), corners - 2);
            assert!(triangles.iter().all(|t| t[0] == 0));
            assert!(triangles.iter().all(|t| t.iter().all(|&c| c < corners)));
        }
        assert_eq!(fan(2).count(), 0);
        assert_eq!(fan(0).count(), 0);
    }

    #[test]
    fn test_fan_quad() {
        assert_eq!(fan(4).collect::<Vec<_>>(), vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_triangles_reference_face_corners() -> Result<(), ParserError> {
        let face = parse_face(&["1", "2", "3", "4", "5"])?;
        let firsts: Vec<usize> = face.triangles().map(|t| t[0].vert_i).collect();
        let lasts: Vec<usize> = face.triangles().map(|t| t[2].vert_i).collect();

        assert_eq!(firsts, vec![1, 1, 1]);
        assert_eq!(lasts, vec![3, 4, 5]);
        Ok(())
    }
}
