//! CLI driver: `litesql <db-path> <command>`.
//!
//! `<command>` is either a dot-command (`.dbinfo`, `.tables`) or a
//! single SQL statement. Output is exactly what's described by the
//! library's contract; this binary only dispatches and formats.

use litesql::error::Error;
use litesql::{executor, output, pager::Pager, parser, schema};
use std::path::PathBuf;
use std::process::ExitCode;

fn run(db_path: &PathBuf, command: &str) -> Result<(), Error> {
    let mut pager = Pager::open(db_path)?;

    match command {
        ".dbinfo" => {
            println!("database page size: {}", pager.page_size());
            println!(
                "number of tables: {}",
                schema::schema_root_cell_count(&mut pager)?
            );
            Ok(())
        }
        ".tables" => {
            let names = schema::list_tables(&mut pager)?;
            println!("{}", names.join(" "));
            Ok(())
        }
        other => {
            let statement = parser::parse_select(other)?;
            match executor::execute(&mut pager, &statement)? {
                executor::QueryResult::Count(n) => println!("{n}"),
                executor::QueryResult::Rows { rows, .. } => {
                    println!("{}", output::format_rows(&rows));
                }
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <db-path> <command>", args.first().map(String::as_str).unwrap_or("litesql"));
        return ExitCode::from(2);
    }
    let db_path = PathBuf::from(&args[1]);
    let command = &args[2];

    match run(&db_path, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
