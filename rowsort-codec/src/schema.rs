use crate::cell::CellType;
use rowsort_base::{schema_error, Result};

/// An immutable, ordered sequence of [`CellType`]s describing every row in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema(Vec<CellType>);

impl Schema {
    pub fn new(columns: Vec<CellType>) -> Self {
        Schema(columns)
    }

    pub fn columns(&self) -> &[CellType] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<CellType> {
        self.0.get(index).copied()
    }

    /// Checked accessor used by the sorter: fails with a schema error rather than panicking
    /// on an out-of-range or non-sortable key index.
    pub fn sortable_column(&self, index: usize) -> Result<CellType> {
        let ty = self
            .0
            .get(index)
            .copied()
            .ok_or_else(|| schema_error(format!("key index {index} out of range for schema")))?;
        if !ty.is_sortable() {
            return Err(schema_error(format!(
                "column {index} has type {ty:?}, which has no defined ordering and cannot be a sort key"
            )));
        }
        Ok(ty)
    }
}

impl FromIterator<CellType> for Schema {
    fn from_iter<T: IntoIterator<Item = CellType>>(iter: T) -> Self {
        Schema(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a CellType;
    type IntoIter = std::slice::Iter<'a, CellType>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
