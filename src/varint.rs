//! SQLite variable-length integers: 1-9 bytes, base-128, big-endian,
//! high bit of each byte (except possibly the last) signals continuation.

use crate::error::{Error, Result};

/// Decodes a varint starting at `buf[0]`. Returns the decoded value and
/// the number of bytes it occupied.
pub fn decode_varint(buf: &[u8]) -> Result<(i64, usize)> {
    let mut result: i64 = 0;
    for i in 0..9 {
        let byte = *buf
            .get(i)
            .ok_or_else(|| Error::Malformed("varint runs past end of buffer".to_string()))?;
        if i == 8 {
            // Ninth byte contributes all 8 bits, no continuation bit.
            result = (result << 8) | byte as i64;
            return Ok((result, 9));
        }
        result = (result << 7) | (byte & 0x7f) as i64;
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }
    unreachable!()
}
