//! Row comparison by a single key column, including the null-ordering policy.
//!
//! Nulls sort first in ascending order and last in descending order, and compare equal to
//! each other. This is pinned by the data model's contract rather than left
//! implementation-defined (the source this crate generalizes leaves null placement
//! unspecified; this policy is the one documented choice).

use rowsort_codec::{compare_values, Row};
use std::cmp::Ordering;

pub(crate) fn compare_rows(a: &Row, b: &Row, key: usize, ascending: bool) -> Ordering {
    let a_cell = a.cell(key).and_then(|c| c.as_ref());
    let b_cell = b.cell(key).and_then(|c| c.as_ref());

    // Treat null as the minimum value, then flip the whole comparison for descending order --
    // this is what makes nulls land first ascending and last descending with no special case.
    let ord = match (a_cell, b_cell) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare_values(x, y),
    };

    if ascending {
        ord
    } else {
        ord.reverse()
    }
}
