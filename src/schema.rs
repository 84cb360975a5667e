//! Resolves table names against `sqlite_schema`, page 1 of every
//! database file.

use crate::btree::table::scan_table;
use crate::error::{Error, Result};
use crate::pager::{Pager, PageNum};
use crate::parser;
use crate::record::Projection;
use crate::value::Value;

pub const SCHEMA_ROOT_PAGE: PageNum = 1;
const SCHEMA_TABLE_NAMES: [&str; 4] = [
    "sqlite_schema",
    "sqlite_master",
    "sqlite_temp_schema",
    "sqlite_temp_master",
];

const COL_TYPE: usize = 0;
const COL_TBL_NAME: usize = 2;
const COL_ROOTPAGE: usize = 3;
const COL_SQL: usize = 4;

/// Everything the executor needs to run a query against one table.
pub struct TableInfo {
    pub root_page: PageNum,
    pub column_names: Vec<String>,
    /// Index of the column that aliases the rowid, if the table was
    /// declared with `INTEGER PRIMARY KEY` (loosely detected, see
    /// `detect_int_pk_column`).
    pub int_pk_column: Option<usize>,
}

fn detect_int_pk_column(columns: &[crate::ast::ColumnDef]) -> Option<usize> {
    columns.iter().position(|c| {
        let lower: Vec<String> = c.type_words.iter().map(|w| w.to_lowercase()).collect();
        lower.len() >= 3 && lower[0] == "integer" && lower[1] == "primary" && lower[2] == "key"
    })
}

/// Resolves `table_name` to its root page, column names, and integer
/// primary key column, if any. `sqlite_schema` and its aliases
/// (`sqlite_master`, `sqlite_temp_schema`, `sqlite_temp_master`) are
/// synthesized without scanning, since they are not self-describing.
/// All name matching, including these aliases, is case-insensitive.
pub fn resolve_table(pager: &mut Pager, table_name: &str) -> Result<TableInfo> {
    if SCHEMA_TABLE_NAMES
        .iter()
        .any(|n| table_name.eq_ignore_ascii_case(n))
    {
        log::warn!("resolving synthetic sqlite_schema row for {table_name}");
        return Ok(TableInfo {
            root_page: SCHEMA_ROOT_PAGE,
            column_names: vec![
                "type".to_string(),
                "name".to_string(),
                "tbl_name".to_string(),
                "rootpage".to_string(),
                "sql".to_string(),
            ],
            int_pk_column: None,
        });
    }

    // Case-insensitive match on tbl_name needs the decoded string in
    // hand, so the comparison happens here rather than as a pushed-down
    // filter, which only supports byte-exact equality.
    let mut found: Option<(PageNum, String)> = None;
    scan_table(pager, SCHEMA_ROOT_PAGE, None, &Projection::all(), |row| {
        if found.is_some() {
            return Ok(());
        }
        let is_table = matches!(&row[COL_TYPE], Value::Text(t) if t == "table");
        let name_matches =
            matches!(&row[COL_TBL_NAME], Value::Text(t) if t.eq_ignore_ascii_case(table_name));
        if !is_table || !name_matches {
            return Ok(());
        }
        let root_page = match &row[COL_ROOTPAGE] {
            Value::Int(n) => *n as PageNum,
            other => {
                return Err(Error::Malformed(format!(
                    "sqlite_schema.rootpage is not an integer: {other:?}"
                )))
            }
        };
        let sql = match &row[COL_SQL] {
            Value::Text(s) => s.clone(),
            other => {
                return Err(Error::Malformed(format!(
                    "sqlite_schema.sql is not text: {other:?}"
                )))
            }
        };
        found = Some((root_page, sql));
        Ok(())
    })?;

    let (root_page, create_sql) = found.ok_or_else(|| Error::UnknownTable(table_name.to_string()))?;
    log::debug!("resolved table {table_name} to root page {root_page}");

    let create = parser::parse_create(&create_sql)?;
    let column_names = create.columns.iter().map(|c| c.name.clone()).collect();
    let int_pk_column = detect_int_pk_column(&create.columns);

    Ok(TableInfo {
        root_page,
        column_names,
        int_pk_column,
    })
}

/// Lists user table names recorded in `sqlite_schema`: rows whose
/// `type == "table"` and whose `tbl_name` does not start with
/// `sqlite_`, in storage (rowid) order.
pub fn list_tables(pager: &mut Pager) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let type_col = Value::Text("table".to_string());
    let projection = Projection {
        columns: Some(&[COL_TBL_NAME]),
        filter: Some((COL_TYPE, &type_col)),
    };
    scan_table(pager, SCHEMA_ROOT_PAGE, None, &projection, |row| {
        if let Value::Text(name) = &row[0] {
            if !name.starts_with("sqlite_") {
                names.push(name.clone());
            }
        }
        Ok(())
    })?;
    Ok(names)
}

/// The `cell_count` recorded in page 1's own b-tree header: the number
/// of `sqlite_schema` rows physically present on that page, used as the
/// `.dbinfo` table count per the dot-command's contract.
pub fn schema_root_cell_count(pager: &mut Pager) -> Result<u32> {
    let page = pager.get_page(SCHEMA_ROOT_PAGE)?;
    let (hdr, _) = crate::btree::header::decode_page_header(page, crate::btree::header::btree_start_offset(SCHEMA_ROOT_PAGE))?;
    Ok(hdr.num_cells)
}
