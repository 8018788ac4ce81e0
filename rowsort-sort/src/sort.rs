//! The public `sort` entry point: a multi-key driver over repeated single-key external
//! merge-sort passes.

use crate::io::{file_len, remove_unless_original, BlockWriter};
use crate::merge::merge;
use crate::scratch::new_scratch_path;
use crate::split::split;
use rowsort_base::{corruption_error, schema_error, Result};
use rowsort_codec::{decode, encode, Schema};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sorts the codec file at `path` by the key tuple named by `key_indices` (most significant
/// first), returning the path of a newly created, fully sorted scratch file.
///
/// `key_indices` must be non-empty and name only sortable (non-blob) columns. The input file
/// is never modified or deleted, and on success every intermediate scratch file this call
/// created has already been removed -- only the caller's input and the returned output remain.
pub fn sort(
    path: impl AsRef<Path>,
    schema: &Schema,
    key_indices: &[usize],
    scratch_dir: impl AsRef<Path>,
    block_size: usize,
    ascending: bool,
) -> Result<PathBuf> {
    let path = path.as_ref();
    let scratch_dir = scratch_dir.as_ref();

    if key_indices.is_empty() {
        return Err(schema_error("sort requires at least one key column"));
    }
    for &key in key_indices {
        schema.sortable_column(key)?;
    }

    debug!(?path, ?key_indices, block_size, ascending, "starting sort");

    // Least-significant key first: each single-key pass is stable, so sorting in this order
    // and finishing on the most significant key yields a lexicographic multi-key order.
    let mut current = path.to_path_buf();
    for &key in key_indices.iter().rev() {
        current = sort_by(&current, schema, key, ascending, block_size, scratch_dir, path)?;
    }
    Ok(current)
}

/// Recursive single-key external sort: splits until each piece fits in `block_size`, sorts
/// those pieces in memory, then merges back up.
fn sort_by(
    path: &Path,
    schema: &Schema,
    key: usize,
    ascending: bool,
    block_size: usize,
    scratch_dir: &Path,
    original_input: &Path,
) -> Result<PathBuf> {
    let size = file_len(path)?;
    if size <= block_size as u64 {
        return sort_in_memory(path, schema, key, ascending, scratch_dir, original_input);
    }

    let (left, right) = split(path, block_size, scratch_dir, original_input)?;
    let left_sorted = sort_by(&left, schema, key, ascending, block_size, scratch_dir, original_input)?;
    let right_sorted = sort_by(&right, schema, key, ascending, block_size, scratch_dir, original_input)?;
    merge(
        &left_sorted,
        &right_sorted,
        schema,
        key,
        ascending,
        block_size,
        scratch_dir,
        original_input,
    )
}

fn sort_in_memory(
    path: &Path,
    schema: &Schema,
    key: usize,
    ascending: bool,
    scratch_dir: &Path,
    original_input: &Path,
) -> Result<PathBuf> {
    let bytes = std::fs::read(path)?;
    let (mut rows, residual) = decode(schema, &bytes)?;
    if !residual.is_empty() {
        return Err(corruption_error(format!(
            "{} has {} trailing bytes that do not form a complete row",
            path.display(),
            residual.len()
        )));
    }

    // `Vec::sort_by` is a stable sort, which is load-bearing: a single-key pass must preserve
    // the relative order of rows that compare equal on this key.
    rows.sort_by(|a, b| crate::compare::compare_rows(a, b, key, ascending));

    let out_path = new_scratch_path(scratch_dir);
    let mut writer = BlockWriter::create_new(&out_path)?;
    writer.write_all(&encode(schema, &rows)?)?;
    writer.finish()?;

    remove_unless_original(path, original_input)?;
    Ok(out_path)
}

#[cfg(test)]
mod test {
    use super::*;
    use rowsort_codec::{CellType, CellValue, Row};
    use test_log::test;

    fn int_schema() -> Schema {
        Schema::new(vec![CellType::I32])
    }

    fn write_file(dir: &Path, rows: &[Row], schema: &Schema) -> PathBuf {
        let path = dir.join("input");
        std::fs::write(&path, encode(schema, rows).unwrap()).unwrap();
        path
    }

    fn int_values(schema: &Schema, path: &Path) -> Vec<Option<i32>> {
        let (rows, residual) = decode(schema, &std::fs::read(path).unwrap()).unwrap();
        assert!(residual.is_empty());
        rows.into_iter()
            .map(|r| {
                r.into_cells().into_iter().next().unwrap().map(|v| match v {
                    CellValue::I32(n) => n,
                    _ => unreachable!(),
                })
            })
            .collect()
    }

    #[test]
    fn empty_file_sorts_to_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let schema = int_schema();
        let path = write_file(dir.path(), &[], &schema);
        let out = sort(&path, &schema, &[0], dir.path(), 4096, true).unwrap();
        assert_eq!(file_len(&out).unwrap(), 0);
    }

    #[test]
    fn single_row_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let schema = int_schema();
        let rows = vec![Row::new(vec![Some(CellValue::I32(42))])];
        let path = write_file(dir.path(), &rows, &schema);
        let out = sort(&path, &schema, &[0], dir.path(), 4096, true).unwrap();
        assert_eq!(int_values(&schema, &out), vec![Some(42)]);
    }

    #[test]
    fn ascending_small_file() {
        let dir = tempfile::tempdir().unwrap();
        let schema = int_schema();
        let rows = vec![3, 1, 2]
            .into_iter()
            .map(|v| Row::new(vec![Some(CellValue::I32(v))]))
            .collect::<Vec<_>>();
        let path = write_file(dir.path(), &rows, &schema);
        let out = sort(&path, &schema, &[0], dir.path(), 4096, true).unwrap();
        assert_eq!(int_values(&schema, &out), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn descending_strings() {
        let dir = tempfile::tempdir().unwrap();
        let schema = Schema::new(vec![CellType::String]);
        let rows = ["banana", "apple", "cherry"]
            .iter()
            .map(|s| Row::new(vec![Some(CellValue::String(s.to_string()))]))
            .collect::<Vec<_>>();
        let path = write_file(dir.path(), &rows, &schema);
        let out = sort(&path, &schema, &[0], dir.path(), 4096, false).unwrap();
        let (rows, residual) = decode(&schema, &std::fs::read(&out).unwrap()).unwrap();
        assert!(residual.is_empty());
        let strings: Vec<String> = rows
            .into_iter()
            .map(|r| match r.into_cells().into_iter().next().unwrap().unwrap() {
                CellValue::String(s) => s,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(strings, vec!["cherry", "banana", "apple"]);
    }

    #[test]
    fn multi_key_stability() {
        let dir = tempfile::tempdir().unwrap();
        let schema = Schema::new(vec![CellType::I32, CellType::String]);
        let data = [(1, "b"), (2, "a"), (1, "a"), (2, "b")];
        let rows: Vec<Row> = data
            .iter()
            .map(|(n, s)| Row::new(vec![Some(CellValue::I32(*n)), Some(CellValue::String(s.to_string()))]))
            .collect();
        let path = write_file(dir.path(), &rows, &schema);
        let out = sort(&path, &schema, &[0, 1], dir.path(), 4096, true).unwrap();
        let (rows, residual) = decode(&schema, &std::fs::read(&out).unwrap()).unwrap();
        assert!(residual.is_empty());
        let got: Vec<(i32, String)> = rows
            .into_iter()
            .map(|r| {
                let mut cells = r.into_cells().into_iter();
                let n = match cells.next().unwrap().unwrap() {
                    CellValue::I32(n) => n,
                    _ => unreachable!(),
                };
                let s = match cells.next().unwrap().unwrap() {
                    CellValue::String(s) => s,
                    _ => unreachable!(),
                };
                (n, s)
            })
            .collect();
        assert_eq!(
            got,
            vec![(1, "a".to_string()), (1, "b".to_string()), (2, "a".to_string()), (2, "b".to_string())]
        );
    }

    #[test]
    fn forces_external_passes_with_small_block_size() {
        let dir = tempfile::tempdir().unwrap();
        let schema = int_schema();
        let mut rows: Vec<Row> = Vec::new();
        let mut expected = Vec::new();
        let mut seed = 12345u32;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let v = (seed >> 8) as i32;
            expected.push(v);
            rows.push(Row::new(vec![Some(CellValue::I32(v))]));
        }
        let path = write_file(dir.path(), &rows, &schema);
        let out = sort(&path, &schema, &[0], dir.path(), 256, true).unwrap();

        let got = int_values(&schema, &out);
        let mut sorted_expected: Vec<Option<i32>> = expected.into_iter().map(Some).collect();
        sorted_expected.sort();
        assert_eq!(got, sorted_expected);

        let remaining: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p != &path && p != &out)
            .collect();
        assert!(remaining.is_empty(), "leftover scratch files: {remaining:?}");
    }

    #[test]
    fn nulls_sort_first_ascending() {
        let dir = tempfile::tempdir().unwrap();
        let schema = int_schema();
        let rows = vec![None, Some(5), None, Some(3)]
            .into_iter()
            .map(|v| Row::new(vec![v.map(CellValue::I32)]))
            .collect::<Vec<_>>();
        let path = write_file(dir.path(), &rows, &schema);
        let out = sort(&path, &schema, &[0], dir.path(), 4096, true).unwrap();
        assert_eq!(int_values(&schema, &out), vec![None, None, Some(3), Some(5)]);
    }

    #[test]
    fn input_file_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let schema = int_schema();
        let rows = vec![3, 1, 2]
            .into_iter()
            .map(|v| Row::new(vec![Some(CellValue::I32(v))]))
            .collect::<Vec<_>>();
        let path = write_file(dir.path(), &rows, &schema);
        let original_bytes = std::fs::read(&path).unwrap();
        let out = sort(&path, &schema, &[0], dir.path(), 4096, true).unwrap();
        assert_ne!(out, path);
        assert_eq!(std::fs::read(&path).unwrap(), original_bytes);
    }

    #[test]
    fn blob_key_is_rejected_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let schema = Schema::new(vec![CellType::Bytes]);
        let rows = vec![Row::new(vec![Some(CellValue::Bytes(vec![1, 2, 3]))])];
        let path = write_file(dir.path(), &rows, &schema);
        let original_bytes = std::fs::read(&path).unwrap();
        assert!(sort(&path, &schema, &[0], dir.path(), 4096, true).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), original_bytes);
    }
}
