//! Decodes SQLite record bodies: a varint-counted header of serial types
//! followed by the column values they describe, plus the table-b-tree
//! leaf cell framing (payload length, rowid, payload bytes) that wraps
//! each record on disk.

use crate::dbheader::Encoding;
use crate::error::{Error, Result};
use crate::value::{self, Value};
use crate::varint::decode_varint;

/// What a caller wants out of a row: which column indices to actually
/// materialize, and an optional equality filter pushed down into the
/// decode pass so non-matching rows never build a `Vec<Value>`.
pub struct Projection<'a> {
    /// Column indices to materialize, in the order they should be
    /// returned. `None` means "all columns" (`SELECT *`).
    pub columns: Option<&'a [usize]>,
    /// An (index, value) filter: a row is skipped unless its column at
    /// `index` equals `value`.
    pub filter: Option<(usize, &'a Value)>,
}

impl<'a> Projection<'a> {
    pub fn all() -> Self {
        Projection {
            columns: None,
            filter: None,
        }
    }
}

/// Computes the number of payload bytes SQLite stores in the b-tree page
/// itself (as opposed to spilled into an overflow chain), per the
/// standard local-payload-size formula from the SQLite file format
/// description (section 1.5, "Cell Payload Overflow").
fn local_payload_size(payload_size: u64, usable_size: u32, is_table_leaf: bool) -> u64 {
    let usable_size = usable_size as u64;
    let max_local = if is_table_leaf {
        usable_size - 35
    } else {
        (usable_size - 12) * 64 / 255 - 23
    };
    if payload_size <= max_local {
        return payload_size;
    }
    let min_local = (usable_size - 12) * 32 / 255 - 23;
    let k = min_local + (payload_size - min_local) % (usable_size - 4);
    if k <= max_local {
        k
    } else {
        min_local
    }
}

/// A decoded table-b-tree leaf cell: the integer key (rowid) and the
/// byte slice of its in-page record payload.
pub struct LeafCell<'a> {
    pub rowid: i64,
    pub payload: &'a [u8],
}

/// Parses a table-b-tree leaf cell: `varint payload_size, varint rowid,
/// payload bytes[, 4-byte overflow page number]`. Returns
/// `Error::Unsupported` if the payload spills into an overflow chain,
/// since traversing overflow pages is out of scope.
pub fn decode_leaf_cell<'a>(cell: &'a [u8], usable_size: u32) -> Result<LeafCell<'a>> {
    let (payload_size, n1) = decode_varint(cell)?;
    let (rowid, n2) = decode_varint(&cell[n1..])?;
    let offset = n1 + n2;

    let local = local_payload_size(payload_size as u64, usable_size, true);
    if local != payload_size as u64 {
        return Err(Error::Unsupported(
            "row payload spills into an overflow page chain".to_string(),
        ));
    }

    let local = local as usize;
    let payload = cell
        .get(offset..offset + local)
        .ok_or_else(|| Error::Malformed("cell shorter than its declared payload".to_string()))?;

    Ok(LeafCell { rowid, payload })
}

/// Parses a table-b-tree interior cell: `4-byte left child page number,
/// varint integer key` (the key itself is unused for a full scan).
pub fn decode_interior_cell(cell: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = cell
        .get(0..4)
        .ok_or_else(|| Error::Malformed("interior cell shorter than a page pointer".to_string()))?
        .try_into()
        .unwrap();
    Ok(u32::from_be_bytes(bytes))
}

/// Decodes the serial-type header of a record, returning one entry per
/// column in storage order.
fn decode_header(payload: &[u8]) -> Result<(Vec<i64>, usize)> {
    let (hdr_len, hdr_len_bytes) = decode_varint(payload)?;
    let hdr_len = hdr_len as usize;
    let mut offset = hdr_len_bytes;
    let mut serial_types = Vec::new();
    while offset < hdr_len {
        let (serial_type, n) = decode_varint(
            payload
                .get(offset..)
                .ok_or_else(|| Error::Malformed("record header runs past payload".to_string()))?,
        )?;
        serial_types.push(serial_type);
        offset += n;
    }
    Ok((serial_types, hdr_len))
}

/// Decodes a record's selected columns, per `Projection`, using `rowid`
/// to fill in an INTEGER PRIMARY KEY column whose serial type is 0 (the
/// alias case described by the file format). `pk_column`, when set,
/// names the column index that aliases the rowid.
///
/// Returns `None` when a filter is present and the row does not match.
pub fn decode(
    payload: &[u8],
    rowid: i64,
    pk_column: Option<usize>,
    projection: &Projection,
    encoding: Encoding,
) -> Result<Option<Vec<Value>>> {
    let (serial_types, hdr_len) = decode_header(payload)?;

    let mut offsets = Vec::with_capacity(serial_types.len());
    let mut offset = hdr_len;
    for &st in &serial_types {
        offsets.push(offset);
        offset += value::serial_type_width(st)?;
    }
    if offset != payload.len() {
        return Err(Error::Malformed(
            "record body length does not match its header".to_string(),
        ));
    }

    let decode_column = |i: usize| -> Result<Value> {
        let st = serial_types[i];
        if st == 0 && pk_column == Some(i) {
            return Ok(Value::Int(rowid));
        }
        let width = value::serial_type_width(st)?;
        let col_bytes = &payload[offsets[i]..offsets[i] + width];
        value::decode_value(st, col_bytes, encoding)
    };

    if let Some((filter_idx, expected)) = projection.filter {
        if filter_idx >= serial_types.len() {
            return Err(Error::UnknownColumn(format!("column index {filter_idx}")));
        }
        let actual = decode_column(filter_idx)?;
        if &actual != expected {
            return Ok(None);
        }
    }

    let indices: Vec<usize> = match projection.columns {
        Some(cols) => cols.to_vec(),
        None => (0..serial_types.len()).collect(),
    };

    let mut row = Vec::with_capacity(indices.len());
    for i in indices {
        if i >= serial_types.len() {
            return Err(Error::UnknownColumn(format!("column index {i}")));
        }
        row.push(decode_column(i)?);
    }
    Ok(Some(row))
}
