//! Reads the 100-byte database file header.
//!
//! Only the two fields the core needs are validated and exposed: the page
//! size (bytes 16-17) and the text encoding tag (byte 56, big-endian u32
//! at offset 56..60 per the file format, though only the low byte is ever
//! non-zero for the three encodings we support).

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error reading file.")]
    Io(#[from] std::io::Error),
    #[error("The magic bytes for this file are wrong.")]
    WrongMagic,
    #[error("Unsupported page size {0}.")]
    UnsupportedPageSize(u16),
    #[error("Unsupported text encoding tag {0}.")]
    UnsupportedEncoding(u32),
}

pub const HEADER_BYTES: usize = 100;

const MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Text encoding declared in the file header (offset 56).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TryFrom<u32> for Encoding {
    type Error = Error;
    fn try_from(tag: u32) -> Result<Self, Error> {
        match tag {
            1 => Ok(Encoding::Utf8),
            2 => Ok(Encoding::Utf16Le),
            3 => Ok(Encoding::Utf16Be),
            other => Err(Error::UnsupportedEncoding(other)),
        }
    }
}

/// Immutable, file-wide configuration derived from the 100-byte header.
#[derive(Debug, Clone, Copy)]
pub struct FileConfig {
    pub page_size: u32,
    pub text_encoding: Encoding,
}

fn page_size_from_raw(raw: u16) -> Result<u32, Error> {
    // A raw value of 1 means 65536; anything else must be a power of two
    // in [512, 32768].
    match raw {
        1 => Ok(65536),
        512 | 1024 | 2048 | 4096 | 8192 | 16384 | 32768 => Ok(raw as u32),
        other => Err(Error::UnsupportedPageSize(other)),
    }
}

/// Parses the 100-byte header from an already-open file.
/// Restores the file position to 0 before returning.
pub fn read_header<R: Read + Seek>(f: &mut R) -> Result<FileConfig, Error> {
    f.seek(SeekFrom::Start(0))?;

    let mut magic = [0_u8; 16];
    f.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(Error::WrongMagic);
    }

    let page_size = page_size_from_raw(f.read_u16::<BigEndian>()?)?;

    // Bytes 18..56 carry fields this core does not need to interpret
    // (format version numbers, reserved space, free-list bookkeeping,
    // schema cookie/format, default cache size). Skip to the encoding
    // tag at offset 56.
    f.seek(SeekFrom::Start(56))?;
    let text_encoding = Encoding::try_from(f.read_u32::<BigEndian>()?)?;

    f.seek(SeekFrom::Start(0))?;
    Ok(FileConfig {
        page_size,
        text_encoding,
    })
}
