//! The `Value` tagged enum and serial-type decoding rules from the
//! SQLite record format.

use crate::dbheader::Encoding;
use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, ""),
            Value::Int(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Blob(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

/// Width in bytes of the column value for a given serial type, per the
/// SQLite record format. Serial types 0, 8, and 9 (NULL, 0, 1) occupy no
/// bytes in the body.
pub fn serial_type_width(serial_type: i64) -> Result<usize> {
    match serial_type {
        0 => Ok(0),
        1 => Ok(1),
        2 => Ok(2),
        3 => Ok(3),
        4 => Ok(4),
        5 => Ok(6),
        6 => Ok(8),
        7 => Ok(8),
        8 | 9 => Ok(0),
        10 | 11 => Err(Error::Malformed(format!(
            "reserved serial type {serial_type} used"
        ))),
        n if n >= 12 && n % 2 == 0 => Ok(((n - 12) / 2) as usize),
        n if n >= 13 => Ok(((n - 13) / 2) as usize),
        n => Err(Error::Malformed(format!("invalid serial type {n}"))),
    }
}

/// Decodes the column bytes for `serial_type` from the front of `buf`,
/// which must be at least `serial_type_width(serial_type)` bytes long.
pub fn decode_value(serial_type: i64, buf: &[u8], encoding: Encoding) -> Result<Value> {
    match serial_type {
        0 => Ok(Value::Null),
        1 => Ok(Value::Int(buf[0] as i8 as i64)),
        2 => Ok(Value::Int(BigEndian::read_i16(buf) as i64)),
        3 => Ok(Value::Int(read_i24(buf))),
        4 => Ok(Value::Int(BigEndian::read_i32(buf) as i64)),
        5 => Ok(Value::Int(read_i48(buf))),
        6 => Ok(Value::Int(BigEndian::read_i64(buf))),
        7 => Ok(Value::Real(BigEndian::read_f64(buf))),
        8 => Ok(Value::Int(0)),
        9 => Ok(Value::Int(1)),
        n if n >= 12 && n % 2 == 0 => Ok(Value::Blob(buf.to_vec())),
        n if n >= 13 => Ok(decode_text(buf, encoding)),
        n => Err(Error::Malformed(format!("invalid serial type {n}"))),
    }
}

fn read_i24(buf: &[u8]) -> i64 {
    let unsigned = ((buf[0] as i64) << 16) | ((buf[1] as i64) << 8) | (buf[2] as i64);
    // Sign-extend from bit 23.
    (unsigned << 40) >> 40
}

fn read_i48(buf: &[u8]) -> i64 {
    let mut unsigned: i64 = 0;
    for &b in &buf[0..6] {
        unsigned = (unsigned << 8) | b as i64;
    }
    // Sign-extend from bit 47.
    (unsigned << 16) >> 16
}

fn decode_text(buf: &[u8], encoding: Encoding) -> Value {
    match encoding {
        Encoding::Utf8 => match std::str::from_utf8(buf) {
            Ok(s) => Value::Text(s.to_string()),
            Err(_) => Value::Blob(buf.to_vec()),
        },
        Encoding::Utf16Le => decode_utf16_with(buf, u16::from_le_bytes),
        Encoding::Utf16Be => decode_utf16_with(buf, u16::from_be_bytes),
    }
}

fn decode_utf16_with(buf: &[u8], unit_from: fn([u8; 2]) -> u16) -> Value {
    if buf.len() % 2 != 0 {
        return Value::Blob(buf.to_vec());
    }
    let units = buf
        .chunks_exact(2)
        .map(|c| unit_from([c[0], c[1]]))
        .collect::<Vec<u16>>();
    match std::char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
    {
        Ok(s) => Value::Text(s),
        Err(_) => Value::Blob(buf.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_match_spec() {
        assert_eq!(serial_type_width(0).unwrap(), 0);
        assert_eq!(serial_type_width(1).unwrap(), 1);
        assert_eq!(serial_type_width(5).unwrap(), 6);
        assert_eq!(serial_type_width(6).unwrap(), 8);
        assert_eq!(serial_type_width(7).unwrap(), 8);
        assert_eq!(serial_type_width(12).unwrap(), 0);
        assert_eq!(serial_type_width(13).unwrap(), 0);
        assert_eq!(serial_type_width(14).unwrap(), 1);
        assert_eq!(serial_type_width(15).unwrap(), 1);
    }

    #[test]
    fn reserved_types_are_malformed() {
        assert!(serial_type_width(10).is_err());
        assert!(serial_type_width(11).is_err());
    }

    #[test]
    fn decodes_48_bit_signed_integer() {
        // -1 as a 6-byte big-endian value: all 0xff.
        let buf = [0xff_u8; 6];
        let v = decode_value(5, &buf, Encoding::Utf8).unwrap();
        assert_eq!(v, Value::Int(-1));

        // 1 as a 6-byte big-endian value.
        let buf = [0, 0, 0, 0, 0, 1];
        let v = decode_value(5, &buf, Encoding::Utf8).unwrap();
        assert_eq!(v, Value::Int(1));
    }

    #[test]
    fn decodes_24_bit_signed_integer() {
        let buf = [0xff, 0xff, 0xff];
        let v = decode_value(3, &buf, Encoding::Utf8).unwrap();
        assert_eq!(v, Value::Int(-1));
    }

    #[test]
    fn decodes_text_under_each_encoding() {
        let v = decode_value(13 + 2 * 5, b"hello", Encoding::Utf8).unwrap();
        assert_eq!(v, Value::Text("hello".to_string()));

        let utf16le: Vec<u8> = "hi".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        let n = 13 + 2 * utf16le.len() as i64;
        let v = decode_value(n, &utf16le, Encoding::Utf16Le).unwrap();
        assert_eq!(v, Value::Text("hi".to_string()));
    }

    #[test]
    fn invalid_text_bytes_fall_back_to_blob() {
        let buf = [0xff, 0xfe, 0xfd];
        let v = decode_value(13 + 2 * 3, &buf, Encoding::Utf8).unwrap();
        assert!(matches!(v, Value::Blob(_)));
    }

    #[test]
    fn constant_zero_and_one() {
        assert_eq!(decode_value(8, &[], Encoding::Utf8).unwrap(), Value::Int(0));
        assert_eq!(decode_value(9, &[], Encoding::Utf8).unwrap(), Value::Int(1));
    }
}
