//! Block-oriented file I/O. Mirrors the teacher's `FileReader`/`FileWriter` split found in
//! `submerge-coldb::ioutil` (a `BufReader`/`BufWriter` pair scoped to one file), minus the
//! `Seek`-based random access that crate needed for footer reads -- this format is read and
//! written purely sequentially, in `block_size`-sized windows.

use rowsort_base::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

pub(crate) fn file_len(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

/// True if `a` and `b` name the same file, used to tell the caller's original input apart
/// from scratch files the sorter owns. Falls back to plain path equality if either side no
/// longer exists to canonicalize (e.g. it was already unlinked).
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => a == b,
    }
}

pub(crate) fn remove_unless_original(path: &Path, original_input: &Path) -> Result<()> {
    if same_file(path, original_input) {
        return Ok(());
    }
    std::fs::remove_file(path)?;
    Ok(())
}

/// Reads sequential `block_size`-sized windows from one file.
pub(crate) struct BlockReader {
    inner: BufReader<File>,
    block_size: usize,
}

impl BlockReader {
    pub(crate) fn open(path: &Path, block_size: usize) -> Result<Self> {
        Ok(BlockReader {
            inner: BufReader::new(File::open(path)?),
            block_size,
        })
    }

    /// Reads up to `block_size` bytes. Returns an empty vec exactly at EOF.
    pub(crate) fn read_block(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.block_size];
        let mut total = 0;
        while total < buf.len() {
            let n = self.inner.read(&mut buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        buf.truncate(total);
        Ok(buf)
    }
}

pub(crate) struct BlockWriter {
    inner: BufWriter<File>,
}

impl BlockWriter {
    pub(crate) fn create_new(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        Ok(BlockWriter {
            inner: BufWriter::new(file),
        })
    }

    pub(crate) fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Copies the byte range `[start, end)` of `src` into newly created file `dst`, in
/// `block_size`-sized chunks.
pub(crate) fn copy_range(src: &Path, dst: &Path, start: u64, end: u64, block_size: usize) -> Result<()> {
    let mut reader = File::open(src)?;
    reader.seek(SeekFrom::Start(start))?;
    let mut writer = BlockWriter::create_new(dst)?;
    let mut remaining = end - start;
    let mut buf = vec![0u8; block_size.max(1)];
    while remaining > 0 {
        let want = remaining.min(buf.len() as u64) as usize;
        reader.read_exact(&mut buf[..want])?;
        writer.write_all(&buf[..want])?;
        remaining -= want as u64;
    }
    writer.finish()
}
