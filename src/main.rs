use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tabscan::{
    DEFAULT_DELIMITER, DEFAULT_PREVIEW_ROWS, DEFAULT_TABLE_WIDTH, PreviewConfig, Table,
    TableConfig, TableError,
};

/// Preview delimited text files and print single columns.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File to load, `~` and environment variables are expanded
    path: String,

    /// Name columns 0..n instead of reading names from the first non-comment line
    #[arg(long)]
    no_header: bool,

    /// Field delimiter
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,

    /// Number of preview rows, 0 or negative shows all
    #[arg(short = 'n', long, default_value_t = DEFAULT_PREVIEW_ROWS, allow_negative_numbers = true)]
    rows: i64,

    /// Soft cap on the preview width
    #[arg(short, long, default_value_t = DEFAULT_TABLE_WIDTH)]
    width: usize,

    /// Print the values of this column instead of the preview (repeatable)
    #[arg(short, long)]
    column: Vec<String>,

    /// Print the column names
    #[arg(short, long)]
    keys: bool,

    /// Print comment lines found in the file
    #[arg(long)]
    comments: bool,
}

fn main() -> ExitCode {
    init_logging();
    match run(Args::parse()) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(ErrorLayer::default())
        .init();
}

fn run(args: Args) -> Result<(), TableError> {
    debug!("Arguments: {args:?}");
    let path = shellexpand::full(&args.path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(&args.path).into_owned());

    let cfg = TableConfig::default()
        .path(path)
        .has_header(!args.no_header)
        .delimiter(args.delimiter)
        .max_table_width(args.width);
    let mut table = Table::try_from_config(cfg)?;

    if args.comments {
        for comment in table.comments() {
            println!("{comment}");
        }
    }
    if args.keys {
        println!("Key: {}", table.column_names().join(", "));
    }

    if args.column.is_empty() {
        let preview = PreviewConfig::default().max_rows(args.rows);
        table.scan_preview(&preview)?;
    } else {
        for name in &args.column {
            let values = table.column(name)?;
            println!("{name}: {}", values.join(", "));
        }
    }

    table.close();
    Ok(())
}
