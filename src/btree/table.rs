//! Iterates over the rows of a table b-tree, hiding the fact that the
//! tree spans several pages.
//!
//! Traversal is depth-first and visits rows in ascending rowid order: on
//! an interior page each child pointer precedes the next, and the
//! right-most pointer (which has no accompanying cell) is visited last.
//! An explicit work stack is used instead of recursion so a malformed or
//! cyclic page graph cannot blow the call stack.

use super::cell::decode_cell_pointers;
use super::header::{btree_start_offset, decode_page_header};
use super::PageType;
use crate::error::{Error, Result};
use crate::pager::{Pager, PageNum};
use crate::record::{self, Projection};
use crate::value::Value;

/// One level of the traversal: the ordered cell offsets for a page and
/// the index of the next cell to visit.
struct Frame {
    page_num: PageNum,
    cell_offsets: Vec<usize>,
    next_cell: usize,
    is_leaf: bool,
    rightmost_pointer: Option<PageNum>,
    visited_rightmost: bool,
}

fn load_frame(pager: &mut Pager, page_num: PageNum) -> Result<Frame> {
    let skip = btree_start_offset(page_num);
    let page = pager.get_page(page_num)?;
    let (hdr, hdr_len) = decode_page_header(page, skip)?;
    let cell_offsets = decode_cell_pointers(page, skip, hdr_len, hdr.num_cells)?;

    let is_leaf = match hdr.page_type {
        PageType::TableLeaf => true,
        PageType::TableInterior => false,
        PageType::IndexLeaf | PageType::IndexInterior => {
            return Err(Error::Unsupported(
                "index b-trees are not supported".to_string(),
            ))
        }
    };

    Ok(Frame {
        page_num,
        cell_offsets,
        next_cell: 0,
        is_leaf,
        rightmost_pointer: hdr.rightmost_pointer,
        visited_rightmost: false,
    })
}

/// Scans every row of the table rooted at `root_page`, applying
/// `projection` during decode, and calls `visit` for each row that
/// survives the filter. `pk_column`, when set, is the column index that
/// aliases the rowid (an INTEGER PRIMARY KEY column).
///
/// Returns the total number of rows visited (i.e. that passed the
/// filter), which doubles as the result for `COUNT(*)`.
pub fn scan_table(
    pager: &mut Pager,
    root_page: PageNum,
    pk_column: Option<usize>,
    projection: &Projection,
    mut visit: impl FnMut(Vec<Value>) -> Result<()>,
) -> Result<usize> {
    let encoding = pager.config.text_encoding;
    let mut stack: Vec<Frame> = vec![load_frame(pager, root_page)?];
    let mut count = 0;

    while let Some(frame) = stack.last_mut() {
        if frame.is_leaf {
            if frame.next_cell >= frame.cell_offsets.len() {
                stack.pop();
                continue;
            }
            let offset = frame.cell_offsets[frame.next_cell];
            frame.next_cell += 1;
            let page_num = frame.page_num;
            let page_size = pager.page_size();
            let page = pager.get_page(page_num)?;
            let cell = &page[offset..];
            let leaf = record::decode_leaf_cell(cell, page_size)?;
            if let Some(row) =
                record::decode(leaf.payload, leaf.rowid, pk_column, projection, encoding)?
            {
                count += 1;
                visit(row)?;
            }
        } else {
            if frame.next_cell < frame.cell_offsets.len() {
                let offset = frame.cell_offsets[frame.next_cell];
                frame.next_cell += 1;
                let page_num = frame.page_num;
                let page = pager.get_page(page_num)?;
                let cell = &page[offset..];
                let child = record::decode_interior_cell(cell)?;
                log::debug!("descending from page {page_num} to child page {child}");
                stack.push(load_frame(pager, child)?);
                continue;
            }
            if !frame.visited_rightmost {
                frame.visited_rightmost = true;
                let child = frame
                    .rightmost_pointer
                    .ok_or_else(|| Error::Malformed("interior page has no rightmost pointer".to_string()))?;
                log::debug!("descending from page {} to rightmost child page {child}", frame.page_num);
                stack.push(load_frame(pager, child)?);
                continue;
            }
            stack.pop();
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbheader::Encoding;

    fn leaf_page_single_row(page_size: usize) -> Vec<u8> {
        // One row: record = header(2) | literal-1(9), body empty.
        let record: &[u8] = &[0x02, 0x09];
        let cell_payload_varint = 0x02_u8; // payload size 2
        let rowid_varint = 0x01_u8;
        let mut cell = vec![cell_payload_varint, rowid_varint];
        cell.extend_from_slice(record);

        let mut page = vec![0_u8; page_size];
        let cell_offset = page_size - cell.len();
        page[cell_offset..].copy_from_slice(&cell);

        // Leaf header: type 0x0d, freeblock 0, num_cells 1, cell_content_start.
        page[0] = 0x0d;
        page[1..3].copy_from_slice(&0_u16.to_be_bytes());
        page[3..5].copy_from_slice(&1_u16.to_be_bytes());
        page[5..7].copy_from_slice(&(cell_offset as u16).to_be_bytes());
        page[7] = 0;
        // Cell pointer array: one entry.
        page[8..10].copy_from_slice(&(cell_offset as u16).to_be_bytes());
        page
    }

    // scan_table takes a &mut Pager backed by a real file; its page
    // and record decoding are exercised directly here instead, and the
    // full multi-page descent is covered by tests/integration_test.rs
    // against an assembled on-disk file.
    #[test]
    fn single_leaf_page_decodes_one_row() {
        let page = leaf_page_single_row(512);
        let (hdr, hdr_len) = decode_page_header(&page, 0).unwrap();
        assert_eq!(hdr.num_cells, 1);
        let offsets = decode_cell_pointers(&page, 0, hdr_len, hdr.num_cells).unwrap();
        let cell = &page[offsets[0]..];
        let leaf = record::decode_leaf_cell(cell, 512).unwrap();
        assert_eq!(leaf.rowid, 1);
        let row = record::decode(leaf.payload, leaf.rowid, None, &Projection::all(), Encoding::Utf8)
            .unwrap()
            .unwrap();
        assert_eq!(row, vec![Value::Int(1)]);
    }
}
