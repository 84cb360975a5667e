//! Decodes the cell pointer array that follows a b-tree page header.

use crate::error::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Seek, SeekFrom};

/// Reads the `num_cells` 2-byte cell offsets that begin at
/// `page_header_start + page_header_len`, in the order they are stored
/// (left-most/smallest key first).
pub fn decode_cell_pointers(
    page: &[u8],
    page_header_start: usize,
    page_header_len: usize,
    num_cells: u32,
) -> Result<Vec<usize>> {
    let mut c = Cursor::new(page);
    c.seek(SeekFrom::Start(
        (page_header_start + page_header_len) as u64,
    ))
    .map_err(|e| Error::Malformed(e.to_string()))?;

    let mut offsets = Vec::with_capacity(num_cells as usize);
    for _ in 0..num_cells {
        let off = c
            .read_u16::<BigEndian>()
            .map_err(|e| Error::Malformed(e.to_string()))? as usize;
        offsets.push(off);
    }
    Ok(offsets)
}

#[cfg(test)]
const TEST_PAGE: &str = "0d00 0000 0a01 ce00 01fb 01f6 01f1 01ec
01e7 01e2 01dd 01d8 01d3 01ce 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 0000
0000 0000 0000 0000 0000 0000 0000 030a
020f 4a03 0902 0f49 0308 020f 4803 0702
0f47 0306 020f 4603 0502 0f45 0304 020f
4403 0302 0f43 0302 020f 4203 0102 0f41";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::header::decode_page_header;
    use hex::FromHex;

    #[test]
    fn decodes_cell_pointer_array() {
        let page: Vec<u8> =
            Vec::from_hex(TEST_PAGE.replace([' ', '\n'], "")).expect("invalid hex string");
        assert_eq!(page.len(), 512);
        let (hdr, hdr_len) = decode_page_header(&page, 0).unwrap();
        let offsets = decode_cell_pointers(&page, 0, hdr_len, hdr.num_cells).unwrap();
        assert_eq!(offsets.len(), 10);
        assert_eq!(offsets[0], 0x01fb);
        assert_eq!(offsets[9], 0x01ce);
    }
}
