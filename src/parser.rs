//! Converts pest parse trees into this crate's AST.

use crate::ast::{ColumnDef, CreateStatement, Literal, SelectItem, SelectStatement, WhereClause};
use crate::error::{Error, Result};
use pest::Parser;

#[derive(Parser)]
#[grammar = "sql.pest"]
struct SqlParser;

fn to_malformed(e: pest::error::Error<Rule>) -> Error {
    Error::Malformed(format!("could not parse SQL: {e}"))
}

/// Parses a single `SELECT` statement.
pub fn parse_select(input: &str) -> Result<SelectStatement> {
    let pair = SqlParser::parse(Rule::select_stmt, input)
        .map_err(to_malformed)?
        .next()
        .ok_or_else(|| Error::Malformed("empty parse of SELECT statement".to_string()))?;

    let mut items = Vec::new();
    let mut table = String::new();
    let mut filter = None;

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::select_list => {
                for item in p.into_inner() {
                    items.push(select_item_from_pair(item)?);
                }
            }
            Rule::identifier => table = p.as_str().to_string(),
            Rule::where_clause => filter = Some(where_clause_from_pair(p)?),
            Rule::EOI => {}
            other => return Err(Error::Malformed(format!("unexpected token {other:?}"))),
        }
    }

    Ok(SelectStatement {
        items,
        table,
        filter,
    })
}

fn select_item_from_pair(pair: pest::iterators::Pair<Rule>) -> Result<SelectItem> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| Error::Malformed("empty select item".to_string()))?;
    match inner.as_rule() {
        Rule::star => Ok(SelectItem::Star),
        Rule::count_star => Ok(SelectItem::CountStar),
        Rule::column_ref => Ok(SelectItem::Column(inner.as_str().to_string())),
        other => Err(Error::Malformed(format!("unexpected select item {other:?}"))),
    }
}

fn where_clause_from_pair(pair: pest::iterators::Pair<Rule>) -> Result<WhereClause> {
    use itertools::Itertools;
    let (column, literal) = pair
        .into_inner()
        .collect_tuple()
        .ok_or_else(|| Error::Malformed("malformed WHERE clause".to_string()))?;
    Ok(WhereClause {
        column: column.as_str().to_string(),
        value: literal_from_pair(literal)?,
    })
}

fn literal_from_pair(pair: pest::iterators::Pair<Rule>) -> Result<Literal> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| Error::Malformed("empty literal".to_string()))?;
    match inner.as_rule() {
        Rule::int_literal => inner
            .as_str()
            .parse::<i64>()
            .map(Literal::Int)
            .map_err(|e| Error::Malformed(format!("bad integer literal: {e}"))),
        Rule::real_literal => Ok(Literal::Real(inner.as_str().to_string())),
        Rule::string_literal => {
            let s = inner.as_str();
            Ok(Literal::String(s[1..s.len() - 1].to_string()))
        }
        other => Err(Error::Malformed(format!("unexpected literal kind {other:?}"))),
    }
}

/// Parses a `CREATE TABLE` statement, as found in the `sql` column of
/// `sqlite_schema`.
pub fn parse_create(input: &str) -> Result<CreateStatement> {
    let pair = SqlParser::parse(Rule::create_stmt, input)
        .map_err(to_malformed)?
        .next()
        .ok_or_else(|| Error::Malformed("empty parse of CREATE TABLE statement".to_string()))?;

    let mut table = String::new();
    let mut columns = Vec::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::identifier => table = p.as_str().to_string(),
            Rule::column_defs => {
                for column_def in p.into_inner() {
                    columns.push(column_def_from_pair(column_def)?);
                }
            }
            Rule::EOI => {}
            other => return Err(Error::Malformed(format!("unexpected token {other:?}"))),
        }
    }

    Ok(CreateStatement { table, columns })
}

fn column_def_from_pair(pair: pest::iterators::Pair<Rule>) -> Result<ColumnDef> {
    let mut inner = pair.into_inner();
    let name = inner
        .next()
        .ok_or_else(|| Error::Malformed("column definition missing name".to_string()))?
        .as_str()
        .to_string();
    let type_words = inner.map(|w| w.as_str().to_string()).collect();
    Ok(ColumnDef { name, type_words })
}
