use crate::cell::CellValue;
use crate::schema::Schema;
use rowsort_base::{schema_error, Result};

/// An ordered sequence of cell values matching a [`Schema`] in length and per-position type.
/// Any cell may be null; null cells carry no payload bytes on disk.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Vec<Option<CellValue>>);

impl Row {
    pub fn new(cells: Vec<Option<CellValue>>) -> Self {
        Row(cells)
    }

    pub fn cells(&self) -> &[Option<CellValue>] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<Option<CellValue>> {
        self.0
    }

    pub fn cell(&self, index: usize) -> Option<&Option<CellValue>> {
        self.0.get(index)
    }

    pub(crate) fn check_matches_schema(&self, schema: &Schema) -> Result<()> {
        if self.0.len() != schema.len() {
            return Err(schema_error(format!(
                "row has {} cells, schema expects {}",
                self.0.len(),
                schema.len()
            )));
        }
        for (cell, declared) in self.0.iter().zip(schema.columns()) {
            if let Some(v) = cell {
                v.check_matches(*declared)?;
            }
        }
        Ok(())
    }
}

impl FromIterator<Option<CellValue>> for Row {
    fn from_iter<T: IntoIterator<Item = Option<CellValue>>>(iter: T) -> Self {
        Row(iter.into_iter().collect())
    }
}
