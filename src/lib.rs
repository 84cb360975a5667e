//! A read-only query engine over the SQLite on-disk file format: a
//! paged B-tree decoder and traversal layer (the core), plus a thin
//! SQL-subset driver layered on top.
//!
//! ```text
//! dbheader -> pager -> btree::{header,cell,table} -> record -> value
//!                                                         ^
//! sql.pest -> parser -> ast -> schema -> executor --------+
//! ```

pub mod ast;
pub mod btree;
pub mod dbheader;
pub mod error;
pub mod executor;
pub mod output;
pub mod pager;
pub mod parser;
pub mod record;
pub mod schema;
pub mod value;
pub mod varint;

extern crate pest;
#[macro_use]
extern crate pest_derive;

pub use error::{Error, Result};
