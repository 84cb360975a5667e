//! Decodes the 8- or 12-byte b-tree page header.
//!
//! A b-tree page is divided into regions in this order:
//! 1. The 100-byte database file header (found on page 1 only)
//! 2. The 8- or 12-byte b-tree page header
//! 3. The cell pointer array
//! 4. Unallocated space
//! 5. The cell content area
//! 6. The reserved region (assumed empty)

use super::PageType;
use crate::error::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Seek, SeekFrom};

#[derive(Debug, Clone)]
pub struct PageHeader {
    pub page_type: PageType,
    pub freeblock_start: u32,
    pub num_cells: u32,
    pub cell_content_start: u32,
    pub rightmost_pointer: Option<u32>,
}

/// Decodes the b-tree page header starting `skip` bytes into `page`
/// (`skip` is 100 on page 1, to step past the file header, and 0 on
/// every other page). Returns the header and the byte length of the
/// header itself (8 for leaf pages, 12 for interior pages).
pub fn decode_page_header(page: &[u8], skip: usize) -> Result<(PageHeader, usize)> {
    let mut c = Cursor::new(page);
    c.seek(SeekFrom::Start(skip as u64))
        .map_err(|e| Error::Malformed(e.to_string()))?;

    let page_type = match c
        .read_u8()
        .map_err(|e| Error::Malformed(e.to_string()))?
    {
        0x02 => PageType::IndexInterior,
        0x05 => PageType::TableInterior,
        0x0a => PageType::IndexLeaf,
        0x0d => PageType::TableLeaf,
        b => return Err(Error::Malformed(format!("invalid b-tree page type byte {b:#x}"))),
    };

    let freeblock_start = c
        .read_u16::<BigEndian>()
        .map_err(|e| Error::Malformed(e.to_string()))? as u32;
    let num_cells = c
        .read_u16::<BigEndian>()
        .map_err(|e| Error::Malformed(e.to_string()))? as u32;
    let cell_content_start = match c
        .read_u16::<BigEndian>()
        .map_err(|e| Error::Malformed(e.to_string()))?
    {
        0 => 65536,
        x => x as u32,
    };
    // Fragmented free bytes count; not needed for read-only traversal.
    let _ = c.read_u8().map_err(|e| Error::Malformed(e.to_string()))?;

    let (rightmost_pointer, header_len) = match page_type {
        PageType::IndexInterior | PageType::TableInterior => (
            Some(
                c.read_u32::<BigEndian>()
                    .map_err(|e| Error::Malformed(e.to_string()))?,
            ),
            12,
        ),
        PageType::IndexLeaf | PageType::TableLeaf => (None, 8),
    };

    Ok((
        PageHeader {
            page_type,
            freeblock_start,
            num_cells,
            cell_content_start,
            rightmost_pointer,
        },
        header_len,
    ))
}

/// Byte offset at which the b-tree page header begins for `page_num`:
/// 100 on page 1 (past the file header), 0 elsewhere.
pub fn btree_start_offset(page_num: crate::pager::PageNum) -> usize {
    match page_num {
        1 => 100,
        _ => 0,
    }
}
