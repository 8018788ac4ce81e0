//! Two-way streaming merge of a pair of already key-sorted codec files.

use crate::compare::compare_rows;
use crate::io::{remove_unless_original, BlockReader, BlockWriter};
use crate::scratch::new_scratch_path;
use rowsort_base::{corruption_error, Result};
use rowsort_codec::{decode, encode, Row, Schema};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::trace;

/// One side of the merge: a block reader plus the decode state needed to pull rows from it
/// one window at a time. `rows`/`row_index` is the currently materialized window; `residual`
/// is the undecoded tail carried from the last block read. `exhausted` latches once a block
/// read comes back empty, which is the reader's EOF signal.
struct Side {
    path: PathBuf,
    reader: BlockReader,
    rows: Vec<Row>,
    row_index: usize,
    residual: Vec<u8>,
    exhausted: bool,
}

impl Side {
    fn open(path: &Path, block_size: usize) -> Result<Self> {
        Ok(Side {
            path: path.to_path_buf(),
            reader: BlockReader::open(path, block_size)?,
            rows: Vec::new(),
            row_index: 0,
            residual: Vec::new(),
            exhausted: false,
        })
    }

    fn current(&self) -> Option<&Row> {
        self.rows.get(self.row_index)
    }

    /// Refills `rows` from the file if the current window is exhausted. Returns `false` if
    /// the window was already empty and there was nothing left on disk to refill it with.
    fn refill(&mut self, schema: &Schema) -> Result<bool> {
        if self.row_index != self.rows.len() {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        let block = self.reader.read_block()?;
        if block.is_empty() {
            self.exhausted = true;
            return Ok(false);
        }

        let mut buf = std::mem::take(&mut self.residual);
        buf.extend_from_slice(&block);
        let (rows, residual) = decode(schema, &buf)?;
        self.rows = rows;
        self.residual = residual;
        self.row_index = 0;
        Ok(true)
    }

    /// Streams whatever is left of this side (remaining decoded rows, then the untouched
    /// rest of the file) straight into `writer`, byte for byte past the leftover row window.
    ///
    /// A non-empty `residual` once the reader hits true EOF means the file ended mid-row --
    /// the same framing violation `sort_in_memory`'s base case rejects -- so it is reported
    /// as a corruption error rather than written out as a dangling partial row.
    fn drain_remainder(&mut self, schema: &Schema, writer: &mut BlockWriter) -> Result<()> {
        if self.row_index < self.rows.len() {
            let leftover = &self.rows[self.row_index..];
            writer.write_all(&encode(schema, leftover)?)?;
        }
        let mut residual = std::mem::take(&mut self.residual);
        loop {
            let block = self.reader.read_block()?;
            if block.is_empty() {
                break;
            }
            residual.extend_from_slice(&block);
            writer.write_all(&residual)?;
            residual.clear();
        }
        if !residual.is_empty() {
            return Err(corruption_error(format!(
                "{} ended with {} trailing bytes that do not form a complete row",
                self.path.display(),
                residual.len()
            )));
        }
        Ok(())
    }
}

/// Merges two key-sorted codec files into one. Ties resolve by emitting the left row first,
/// which is what makes a single-key pass stable and, combined with the least-significant-first
/// multi-key driver, makes the overall sort lexicographic in the key tuple.
pub(crate) fn merge(
    left: &Path,
    right: &Path,
    schema: &Schema,
    key: usize,
    ascending: bool,
    block_size: usize,
    scratch_dir: &Path,
    original_input: &Path,
) -> Result<PathBuf> {
    let out_path = new_scratch_path(scratch_dir);
    trace!(?left, ?right, ?out_path, "merging");

    let mut left_side = Side::open(left, block_size)?;
    let mut right_side = Side::open(right, block_size)?;
    let mut writer = BlockWriter::create_new(&out_path)?;
    let mut batch: Vec<Row> = Vec::new();

    loop {
        if !left_side.refill(schema)? {
            break;
        }
        if !right_side.refill(schema)? {
            break;
        }

        while let (Some(l), Some(r)) = (left_side.current(), right_side.current()) {
            match compare_rows(l, r, key, ascending) {
                Ordering::Less | Ordering::Equal => {
                    batch.push(l.clone());
                    left_side.row_index += 1;
                }
                Ordering::Greater => {
                    batch.push(r.clone());
                    right_side.row_index += 1;
                }
            }
        }

        if !batch.is_empty() {
            writer.write_all(&encode(schema, &batch)?)?;
            batch.clear();
        }
    }

    left_side.drain_remainder(schema, &mut writer)?;
    right_side.drain_remainder(schema, &mut writer)?;
    writer.finish()?;

    remove_unless_original(left, original_input)?;
    remove_unless_original(right, original_input)?;

    Ok(out_path)
}
