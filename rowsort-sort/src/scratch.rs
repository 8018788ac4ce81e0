//! Process-wide unique scratch-file names.
//!
//! A single atomic counter, formatted as a zero-padded 15-digit decimal string so names stay
//! lexicographically ordered by creation order (not load-bearing for correctness, just a
//! debugging convenience -- nothing in the sorter relies on directory listing order).
//! Sharing this counter across concurrent sorts would race and collide; the crate does not
//! support concurrent invocation, matching the single-threaded resource model.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) fn new_scratch_path(scratch_dir: &Path) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    scratch_dir.join(format!("{n:015}"))
}
