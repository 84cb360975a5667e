//! Crate-wide error type.
//!
//! Lower layers (`dbheader`, `pager`) keep their own small error enums,
//! matching the byte-exact failure modes of opening a file. Everything
//! from the B-tree layer up returns [`Error`] directly, since the error
//! taxonomy is defined once for the whole system, not per layer.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed database: {0}")]
    Malformed(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("Unknown table '{0}'")]
    UnknownTable(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
}

impl From<crate::dbheader::Error> for Error {
    fn from(e: crate::dbheader::Error) -> Self {
        match e {
            crate::dbheader::Error::Io(e) => Error::Io(e),
            other => Error::Malformed(other.to_string()),
        }
    }
}

impl From<crate::pager::Error> for Error {
    fn from(e: crate::pager::Error) -> Self {
        match e {
            crate::pager::Error::Io(e) => Error::Io(e),
            crate::pager::Error::PageNumberBeyondLimits(n) => {
                Error::Malformed(format!("page number {n} is beyond the file's extent"))
            }
            crate::pager::Error::Header(e) => Error::from(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
