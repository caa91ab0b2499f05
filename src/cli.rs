use clap::Parser;
use std::path::PathBuf;

/// Row-filtering and column-projection utility for quoted CSV text.
#[derive(Parser, Debug)]
#[command(name = "rowfilter", version, about)]
pub struct Cli {
    /// Input CSV file. Reads standard input if omitted.
    pub input: Option<PathBuf>,

    /// Boolean filter expression; rows it doesn't evaluate true for are dropped.
    #[arg(long)]
    pub filter: Option<String>,

    /// Comma-separated columns to keep, in the given order. Keeps every
    /// column, in header order, if omitted.
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Treat every line as data; column identifiers default to col0, col1, ...
    #[arg(long)]
    pub no_header: bool,

    /// Print the header-to-identifier alias table and exit without filtering.
    #[arg(short = 's', long = "show-headers")]
    pub show_headers: bool,

    /// Increase log verbosity (-v, -vv). Can also be set via RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
