//! Splitting a codec file into two row-aligned halves that straddle the midpoint.

use crate::io::{copy_range, file_len, remove_unless_original};
use crate::scratch::new_scratch_path;
use rowsort_base::Result;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Finds the first row-start offset at or past `size / 2`, then copies the bytes before it
/// into a fresh scratch file and the bytes from it onward into another. `path` is unlinked
/// afterward unless it is the caller's original input.
pub(crate) fn split(
    path: &Path,
    block_size: usize,
    scratch_dir: &Path,
    original_input: &Path,
) -> Result<(PathBuf, PathBuf)> {
    let size = file_len(path)?;
    let boundary = find_row_boundary(path, size)?;

    let left_path = new_scratch_path(scratch_dir);
    let right_path = new_scratch_path(scratch_dir);
    trace!(?path, ?left_path, ?right_path, size, boundary, "splitting file");

    copy_range(path, &left_path, 0, boundary, block_size)?;
    copy_range(path, &right_path, boundary, size, block_size)?;
    remove_unless_original(path, original_input)?;

    Ok((left_path, right_path))
}

/// Scans row-length prefixes from the start of the file, accumulating position until the
/// next row would cross `size / 2`. A single-row file lands the boundary at end-of-file, so
/// the right half comes out empty -- callers treat an empty file as already sorted.
fn find_row_boundary(path: &Path, size: u64) -> Result<u64> {
    let mut file = File::open(path)?;
    let half = size / 2;
    let mut index = 0u64;
    while index < half {
        file.seek(SeekFrom::Start(index))?;
        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf)?;
        let row_len = u32::from_le_bytes(len_buf) as u64;
        index += row_len;
    }
    Ok(index)
}
