//! `json-log-formatter`: pretty-print JSON payloads in a capture transcript.

use std::{io::Write, path::PathBuf, process::ExitCode};

use clap::Parser;
use log_formatter::{format_file, FormatError, FormatTarget};

#[derive(Debug, Parser)]
#[command(name = "json-log-formatter")]
#[command(about = "Format JSON in log files with proper indentation")]
struct Args {
    /// Path to the input log file.
    input_file: PathBuf,

    /// Path to the output file (default: `<stem>_formatted<.ext>` beside the input).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let target = args
        .output
        .map(FormatTarget::File)
        .unwrap_or_else(|| FormatTarget::default_for(&args.input_file));

    match run(&args.input_file, &target) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &std::path::Path, target: &FormatTarget) -> Result<(), FormatError> {
    match format_file(input, target)? {
        Some(formatted) => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(formatted.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| FormatError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
        None => {
            if let FormatTarget::File(path) = target {
                println!("Formatted log saved to {}", path.display());
            }
            Ok(())
        }
    }
}
