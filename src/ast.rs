//! Abstract syntax tree for the small SQL subset this crate accepts:
//! `SELECT` with `*`, a column list, or `COUNT(*)`, an optional single
//! equality `WHERE`, and `CREATE TABLE` (read from `sqlite_schema`, not
//! parsed from user input, but sharing this AST).

use enum_as_inner::EnumAsInner;

#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum SelectItem {
    Star,
    CountStar,
    Column(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Real(String),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub column: String,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub items: Vec<SelectItem>,
    pub table: String,
    pub filter: Option<WhereClause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub type_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStatement {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}
