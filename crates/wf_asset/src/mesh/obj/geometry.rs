use super::parser::ParserError;

/// Raw `v`/`vt`/`vn` records in declaration order, addressed by their 1-based index.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ObjGeometry {
    pub(crate) positions: Vec<[f32; 3]>,
    pub(crate) uvs: Vec<[f32; 2]>,
    pub(crate) normals: Vec<[f32; 3]>,
}

impl ObjGeometry {
    pub(crate) fn position(&self, index: usize) -> Result<[f32; 3], ParserError> {
        lookup(&self.positions, index, "position")
    }

    pub(crate) fn uv(&self, index: usize) -> Result<[f32; 2], ParserError> {
        lookup(&self.uvs, index, "texture coordinate")
    }

    pub(crate) fn normal(&self, index: usize) -> Result<[f32; 3], ParserError> {
        lookup(&self.normals, index, "normal")
    }
}

fn lookup<T: Copy>(table: &[T], index: usize, attribute: &'static str) -> Result<T, ParserError> {
    index
        .checked_sub(1)
        .and_then(|i| table.get(i))
        .copied()
        .ok_or(ParserError::DanglingReference {
            attribute,
            index,
            count: table.len(),
        })
}
