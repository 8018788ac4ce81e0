//! Recursive split/sort/merge external sort over [`rowsort_codec`]-framed files.
//!
//! The single public entry point is [`sort`]; [`config::SortRequest`] is a builder over it
//! for callers who would rather not spell out every positional argument. Everything else
//! (block I/O, scratch-file naming, split, merge, per-row comparison) is private: this crate
//! has no business exposing recursion internals to callers.

mod compare;
pub mod config;
mod io;
mod merge;
mod scratch;
mod sort;
mod split;

pub use config::SortRequest;
pub use sort::sort;
