//! `SortRequest`: an ergonomic builder over [`crate::sort::sort`] for callers that would
//! rather not spell out every positional argument. Pure sugar -- it carries no semantics of
//! its own and `sort(...)` remains the canonical entry point.

use rowsort_base::{schema_error, Result};
use rowsort_codec::Schema;
use std::path::{Path, PathBuf};

/// Defaults mirror the contract's requirements rather than guessing at convenience values:
/// ascending is the default direction, and there is no default block size because the
/// contract requires the caller to pick one that exceeds their largest encoded row.
pub struct SortRequest<'a> {
    path: PathBuf,
    schema: &'a Schema,
    key_indices: Vec<usize>,
    scratch_dir: PathBuf,
    block_size: Option<usize>,
    ascending: bool,
}

impl<'a> SortRequest<'a> {
    pub fn new(path: impl Into<PathBuf>, schema: &'a Schema, scratch_dir: impl Into<PathBuf>) -> Self {
        SortRequest {
            path: path.into(),
            schema,
            key_indices: Vec::new(),
            scratch_dir: scratch_dir.into(),
            block_size: None,
            ascending: true,
        }
    }

    pub fn key(mut self, index: usize) -> Self {
        self.key_indices.push(index);
        self
    }

    pub fn keys(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.key_indices.extend(indices);
        self
    }

    pub fn block_size(mut self, bytes: usize) -> Self {
        self.block_size = Some(bytes);
        self
    }

    pub fn descending(mut self) -> Self {
        self.ascending = false;
        self
    }

    pub fn ascending(mut self) -> Self {
        self.ascending = true;
        self
    }

    pub fn run(self) -> Result<PathBuf> {
        let block_size = self
            .block_size
            .ok_or_else(|| schema_error("SortRequest::run called without a block_size"))?;
        crate::sort::sort(
            &self.path,
            self.schema,
            &self.key_indices,
            &self.scratch_dir,
            block_size,
            self.ascending,
        )
    }
}
