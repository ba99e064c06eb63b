//! # labreport CLI
//!
//! Usage:
//!   labreport draft.json -o report.pdf
//!   labreport --example > draft.json

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use labreport::model::EXAMPLE_DRAFT;
use labreport::ReportError;

#[derive(Parser)]
#[command(name = "labreport")]
#[command(version)]
#[command(about = "Render a laboratory test report draft to PDF", long_about = None)]
struct Cli {
    /// Report draft (JSON)
    #[arg(value_name = "FILE", required_unless_present = "example")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(short, long, value_name = "FILE", default_value = "report.pdf")]
    output: PathBuf,

    /// Print a complete example draft and exit
    #[arg(long)]
    example: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.example {
        print!("{}", EXAMPLE_DRAFT);
        return;
    }

    let Some(input) = cli.input else {
        eprintln!("✗ No input draft given");
        process::exit(2);
    };

    match run(&input, &cli.output) {
        Ok(written) => {
            eprintln!("✓ Written {} bytes to {}", written, cli.output.display());
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    }
}

fn run(input: &Path, output: &Path) -> Result<usize, ReportError> {
    let json = fs::read_to_string(input).map_err(|e| ReportError::Io {
        path: input.to_path_buf(),
        source: e,
    })?;
    let base = input.parent().unwrap_or_else(|| Path::new("."));
    labreport::render_json_to_path(&json, base, output)
}
