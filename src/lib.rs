//! `rowfilter`: reads delimited tabular text, optionally drops rows that
//! don't satisfy a filter expression, optionally projects a subset of
//! columns, and writes the surviving rows back out in the same syntax.
//!
//! The filter expression language itself — lexer, parser, typed tree, row
//! evaluator — lives in `rowfilter-diagnostics`/`rowfilter-lexer`/
//! `rowfilter-value`/`rowfilter-expr`/`rowfilter-engine`. This crate is the
//! runnable host: CLI parsing, CSV I/O, the headers/row implementations of
//! the core's external collaborator contracts, and the row-admission loop.

mod cli;
mod csv;
mod error;
mod headers;
mod numeric;
mod row;

pub use cli::Cli;
pub use error::CliError;
pub use headers::HeaderTable;
pub use row::CsvRow;

use rowfilter_engine::Engine;
use rowfilter_expr::Headers as _;
use rowfilter_value::NodeType;
use std::io::{Read, Write};

/// Runs the filter/project pipeline described by `cli`, reading from its
/// input (or stdin) and writing CSV text to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let input_text = read_input(cli)?;
    let mut records = csv::parse_records(&input_text);
    if records.is_empty() {
        return Ok(());
    }

    let original_names = if cli.no_header {
        let width = records[0].len();
        (0..width).map(|i| format!("col{i}")).collect()
    } else {
        records.remove(0).into_iter().map(|f| f.text).collect()
    };
    let headers = HeaderTable::new(original_names);

    if cli.show_headers {
        writeln!(out, "{}", headers.render_table()).map_err(CliError::Write)?;
        return Ok(());
    }

    let projection = resolve_projection(cli, &headers)?;

    let engine = match &cli.filter {
        Some(expr) => {
            let engine = Engine::new(expr, &headers);
            if !engine.ok() {
                return Err(CliError::Filter(engine.error(), expr.clone()));
            }
            Some(engine)
        }
        None => None,
    };

    if !cli.no_header {
        let header_line: Vec<String> = projection.iter().map(|&i| headers.original_names()[i].clone()).collect();
        writeln!(out, "{}", csv::write_record(&header_line)).map_err(CliError::Write)?;
    }

    for (line_number, record) in records.into_iter().enumerate() {
        if record.len() != headers.len() {
            return Err(CliError::FieldCountMismatch { line: line_number + 1, expected: headers.len(), found: record.len() });
        }
        let row = CsvRow::new(record);

        if let Some(engine) = &engine {
            let result = engine.evaluate(&row);
            match result.node_type() {
                NodeType::Bool if result.as_boolean() => {}
                NodeType::Bool => continue,
                NodeType::Error => {
                    tracing::warn!(line = line_number + 1, error = result.as_error(), "dropping row: filter evaluation error");
                    continue;
                }
                other => {
                    tracing::warn!(line = line_number + 1, ?other, "dropping row: filter did not evaluate to a boolean");
                    continue;
                }
            }
        }

        let projected: Vec<String> = projection.iter().map(|&i| row.raw(i).to_string()).collect();
        writeln!(out, "{}", csv::write_record(&projected)).map_err(CliError::Write)?;
    }

    Ok(())
}

fn read_input(cli: &Cli) -> Result<String, CliError> {
    match &cli.input {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(|source| CliError::Read { path: "<stdin>".into(), source })?;
            Ok(buf)
        }
    }
}

fn resolve_projection(cli: &Cli, headers: &HeaderTable) -> Result<Vec<usize>, CliError> {
    match &cli.columns {
        Some(names) => names
            .iter()
            .map(|name| headers.index_of(name.trim()).ok_or_else(|| CliError::UnknownColumn { name: name.clone() }))
            .collect(),
        None => Ok((0..headers.len()).collect()),
    }
}
