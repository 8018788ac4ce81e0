use crate::cell::{f32_to_half_bits, half_bits_to_f32, CellValue};
use crate::row::Row;
use crate::schema::Schema;
use rowsort_base::{corruption_error, encoding_error, Result};

const LEN_PREFIX_WIDTH: usize = 4;

/// Serializes `rows` against `schema` into the concatenation of their per-row encodings.
/// See the row codec's framing contract: a 4-byte little-endian length prefix (counting
/// itself), then one null-flag byte per column followed by its payload when present.
pub fn encode(schema: &Schema, rows: &[Row]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for row in rows {
        encode_row(schema, row, &mut out)?;
    }
    Ok(out)
}

fn encode_row(schema: &Schema, row: &Row, out: &mut Vec<u8>) -> Result<()> {
    row.check_matches_schema(schema)?;

    let mut body = Vec::new();
    for (cell, ty) in row.cells().iter().zip(schema.columns()) {
        match cell {
            None => body.push(1u8),
            Some(value) => {
                body.push(0u8);
                encode_payload(value, &mut body)?;
            }
        }
    }

    let total_len = LEN_PREFIX_WIDTH + body.len();
    let len_u32: u32 = total_len
        .try_into()
        .map_err(|_| encoding_error("encoded row exceeds u32::MAX bytes"))?;
    out.extend_from_slice(&len_u32.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(())
}

fn encode_payload(value: &CellValue, out: &mut Vec<u8>) -> Result<()> {
    use CellValue::*;
    match value {
        I8(v) => out.extend_from_slice(&v.to_le_bytes()),
        U8(v) => out.extend_from_slice(&v.to_le_bytes()),
        I16(v) => out.extend_from_slice(&v.to_le_bytes()),
        U16(v) => out.extend_from_slice(&v.to_le_bytes()),
        I32(v) => out.extend_from_slice(&v.to_le_bytes()),
        U32(v) => out.extend_from_slice(&v.to_le_bytes()),
        I64(v) => out.extend_from_slice(&v.to_le_bytes()),
        U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Bool(b) => out.push(if *b { 1 } else { 0 }),
        Char(c) => {
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            if s.len() != 1 {
                return Err(encoding_error(format!(
                    "char cell '{c}' is not a single UTF-8 byte"
                )));
            }
            out.push(s.as_bytes()[0]);
        }
        F16(f) => out.extend_from_slice(&f32_to_half_bits(*f).to_le_bytes()),
        F32(f) => out.extend_from_slice(&f.to_le_bytes()),
        F64(f) => out.extend_from_slice(&f.to_le_bytes()),
        String(s) => {
            let len: u32 = s
                .len()
                .try_into()
                .map_err(|_| encoding_error("string payload exceeds u32::MAX bytes"))?;
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        Bytes(b) => {
            let len: u32 = b
                .len()
                .try_into()
                .map_err(|_| encoding_error("blob payload exceeds u32::MAX bytes"))?;
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(b);
        }
    }
    Ok(())
}

/// Consumes the prefix of `buffer` that contains whole rows. Returns the decoded rows plus
/// whatever trailing bytes do not yet form a complete row -- the caller is expected to
/// prepend these residual bytes to the next block it reads.
pub fn decode(schema: &Schema, buffer: &[u8]) -> Result<(Vec<Row>, Vec<u8>)> {
    let mut rows = Vec::new();
    let mut pos = 0usize;

    loop {
        let remaining = &buffer[pos..];
        if remaining.len() < LEN_PREFIX_WIDTH {
            return Ok((rows, remaining.to_vec()));
        }
        let len = u32::from_le_bytes(remaining[0..4].try_into().unwrap()) as usize;
        if len > remaining.len() {
            return Ok((rows, remaining.to_vec()));
        }
        if len < LEN_PREFIX_WIDTH {
            return Err(corruption_error(format!(
                "row length {len} is smaller than the length prefix itself"
            )));
        }
        let row_bytes = &remaining[..len];
        let row = decode_row(schema, row_bytes)?;
        rows.push(row);
        pos += len;
    }
}

fn decode_row(schema: &Schema, row_bytes: &[u8]) -> Result<Row> {
    let mut cursor = LEN_PREFIX_WIDTH;
    let mut cells = Vec::with_capacity(schema.len());

    for ty in schema.columns() {
        let flag = *row_bytes
            .get(cursor)
            .ok_or_else(|| corruption_error("row truncated before null flag"))?;
        cursor += 1;
        match flag {
            1 => cells.push(None),
            0 => {
                let (value, consumed) = decode_payload(*ty, &row_bytes[cursor..])?;
                cursor += consumed;
                cells.push(Some(value));
            }
            other => {
                return Err(corruption_error(format!(
                    "null flag byte must be 0 or 1, found {other}"
                )))
            }
        }
    }

    if cursor != row_bytes.len() {
        return Err(corruption_error(format!(
            "row declared length {} but decoding consumed {cursor} bytes",
            row_bytes.len()
        )));
    }

    Ok(Row::new(cells))
}

fn decode_payload(ty: crate::cell::CellType, buf: &[u8]) -> Result<(CellValue, usize)> {
    use crate::cell::CellType::*;

    let need = |n: usize| -> Result<&[u8]> {
        buf.get(..n)
            .ok_or_else(|| corruption_error("row truncated mid-payload"))
    };

    Ok(match ty {
        I8 => (CellValue::I8(need(1)?[0] as i8), 1),
        U8 => (CellValue::U8(need(1)?[0]), 1),
        I16 => (CellValue::I16(i16::from_le_bytes(need(2)?.try_into().unwrap())), 2),
        U16 => (CellValue::U16(u16::from_le_bytes(need(2)?.try_into().unwrap())), 2),
        I32 => (CellValue::I32(i32::from_le_bytes(need(4)?.try_into().unwrap())), 4),
        U32 => (CellValue::U32(u32::from_le_bytes(need(4)?.try_into().unwrap())), 4),
        I64 => (CellValue::I64(i64::from_le_bytes(need(8)?.try_into().unwrap())), 8),
        U64 => (CellValue::U64(u64::from_le_bytes(need(8)?.try_into().unwrap())), 8),
        Bool => {
            let b = need(1)?[0];
            if b > 1 {
                return Err(corruption_error(format!("bool payload must be 0 or 1, found {b}")));
            }
            (CellValue::Bool(b == 1), 1)
        }
        Char => {
            let byte = need(1)?[0];
            if !byte.is_ascii() {
                return Err(corruption_error(
                    "char payload is not a valid single-byte UTF-8 code unit",
                ));
            }
            (CellValue::Char(byte as char), 1)
        }
        F16 => {
            let bits = u16::from_le_bytes(need(2)?.try_into().unwrap());
            (CellValue::F16(half_bits_to_f32(bits)), 2)
        }
        F32 => (CellValue::F32(f32::from_le_bytes(need(4)?.try_into().unwrap())), 4),
        F64 => (CellValue::F64(f64::from_le_bytes(need(8)?.try_into().unwrap())), 8),
        String => {
            let len = u32::from_le_bytes(need(4)?.try_into().unwrap()) as usize;
            let bytes = buf
                .get(4..4 + len)
                .ok_or_else(|| corruption_error("string payload truncated"))?;
            let s = std::str::from_utf8(bytes)
                .map_err(|_| corruption_error("string payload is not valid UTF-8"))?
                .to_owned();
            (CellValue::String(s), 4 + len)
        }
        Bytes => {
            let len = u32::from_le_bytes(need(4)?.try_into().unwrap()) as usize;
            let bytes = buf
                .get(4..4 + len)
                .ok_or_else(|| corruption_error("blob payload truncated"))?
                .to_vec();
            (CellValue::Bytes(bytes), 4 + len)
        }
    })
}
