//! Public facade over the row codec and external merge sort: re-exports the three entry
//! points a caller needs ([`encode`], [`decode`], [`sort`]) plus the data-model types used to
//! describe schemas and rows. Everything else lives in `rowsort-codec` / `rowsort-sort` as an
//! implementation detail of these three functions.

pub use rowsort_base::{Error, Result};
pub use rowsort_codec::{compare_values, CellType, CellValue, Row, Schema};
pub use rowsort_codec::{decode, encode};
pub use rowsort_sort::{sort, SortRequest};
