use std::path::PathBuf;

use clap::Parser;
use navis_export::export::{self, DEFAULT_CSV_FILE, DEFAULT_LOG_FILE, ExportOptions};
use navis_export::io::input::{TerminalPrompt, resolve_input};
use navis_export::{Result, ToolError};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directives.
const LOG_FILTER_ENV: &str = "NAVIS_EXPORT_LOG";

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;

    let mut prompt = TerminalPrompt::new(std::env::current_dir()?);
    let input = resolve_input(cli.path.as_deref(), &mut prompt)?;

    let options = cli.export_options();
    export::export_document(&input, &options)?;

    println!(
        "Processing complete. Check {} and {}",
        options.csv_path.display(),
        options.log_path.display()
    );
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Parse Navisworks viewpoint XML comments into CSV."
)]
struct Cli {
    /// Path to the XML file to parse. Prompts when omitted.
    path: Option<PathBuf>,

    /// Stream diagnostic entries to the console while processing.
    #[arg(long)]
    stream_debug: bool,

    /// Output CSV file. Its stem also names the image references.
    #[arg(long, default_value = DEFAULT_CSV_FILE)]
    csv: PathBuf,

    /// Output file for the diagnostic trace.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log: PathBuf,

    /// Also write the table to this Excel workbook.
    #[arg(long)]
    xlsx: Option<PathBuf>,
}

impl Cli {
    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            csv_path: self.csv.clone(),
            log_path: self.log.clone(),
            xlsx_path: self.xlsx.clone(),
            stream_debug: self.stream_debug,
        }
    }
}
