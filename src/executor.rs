//! Resolves a parsed `SELECT` against the schema and drives a table
//! scan, applying projection and an optional equality filter.

use crate::ast::{Literal, SelectItem, SelectStatement};
use crate::error::{Error, Result};
use crate::pager::Pager;
use crate::record::Projection;
use crate::schema;
use crate::value::Value;

/// The result of executing a statement: either a count (for
/// `COUNT(*)`) or a set of rows with their column headers.
#[derive(Debug)]
pub enum QueryResult {
    Count(usize),
    Rows {
        column_names: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
}

fn literal_to_value(literal: &Literal) -> Value {
    match literal {
        Literal::Int(i) => Value::Int(*i),
        Literal::Real(s) => Value::Real(s.parse().unwrap_or(f64::NAN)),
        Literal::String(s) => Value::Text(s.clone()),
    }
}

fn column_index(column_names: &[String], name: &str) -> Result<usize> {
    column_names
        .iter()
        .position(|c| c.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownColumn(name.to_string()))
}

pub fn execute(pager: &mut Pager, statement: &SelectStatement) -> Result<QueryResult> {
    let table = schema::resolve_table(pager, &statement.table)?;

    let filter_value = statement
        .filter
        .as_ref()
        .map(|w| literal_to_value(&w.value));
    let filter_idx = match &statement.filter {
        Some(w) => Some(column_index(&table.column_names, &w.column)?),
        None => None,
    };
    let filter = match (filter_idx, &filter_value) {
        (Some(idx), Some(v)) => Some((idx, v)),
        _ => None,
    };

    if statement.items == [SelectItem::CountStar] {
        let projection = Projection {
            columns: Some(&[]),
            filter,
        };
        let count = crate::btree::table::scan_table(
            pager,
            table.root_page,
            table.int_pk_column,
            &projection,
            |_row| Ok(()),
        )?;
        return Ok(QueryResult::Count(count));
    }

    let (column_indices, column_names): (Vec<usize>, Vec<String>) = match statement
        .items
        .iter()
        .all(|i| *i == SelectItem::Star)
        && statement.items.len() == 1
    {
        true => (
            (0..table.column_names.len()).collect(),
            table.column_names.clone(),
        ),
        false => {
            let mut indices = Vec::new();
            let mut names = Vec::new();
            for item in &statement.items {
                match item {
                    SelectItem::Column(name) => {
                        indices.push(column_index(&table.column_names, name)?);
                        names.push(name.clone());
                    }
                    SelectItem::Star => {
                        return Err(Error::Unsupported(
                            "'*' cannot be combined with other select items".to_string(),
                        ))
                    }
                    SelectItem::CountStar => {
                        return Err(Error::Unsupported(
                            "COUNT(*) cannot be combined with other select items".to_string(),
                        ))
                    }
                }
            }
            (indices, names)
        }
    };

    let projection = Projection {
        columns: Some(&column_indices),
        filter,
    };

    let mut rows = Vec::new();
    crate::btree::table::scan_table(
        pager,
        table.root_page,
        table.int_pk_column,
        &projection,
        |row| {
            rows.push(row);
            Ok(())
        },
    )?;

    Ok(QueryResult::Rows { column_names, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::WhereClause;

    #[test]
    fn literal_conversion_matches_value_variants() {
        assert_eq!(literal_to_value(&Literal::Int(5)), Value::Int(5));
        assert_eq!(
            literal_to_value(&Literal::String("x".to_string())),
            Value::Text("x".to_string())
        );
    }

    #[test]
    fn column_index_reports_unknown_column() {
        let names = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            column_index(&names, "c"),
            Err(Error::UnknownColumn(_))
        ));
        assert_eq!(column_index(&names, "b").unwrap(), 1);
    }

    #[test]
    fn where_clause_round_trips_into_a_value() {
        let w = WhereClause {
            column: "id".to_string(),
            value: Literal::Int(3),
        };
        assert_eq!(literal_to_value(&w.value), Value::Int(3));
    }
}
