//! `command-capture`: run a command with its stdio recorded to a transcript.

mod cli;

use clap::Parser;
use command_capture::{
    diagnostics, signal, CaptureSession, SessionPaths, SignalBridge, FAILURE_EXIT_CODE,
};
use tracing::error;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    let config = args.into_config();
    let paths = SessionPaths::now(config.log_dir());

    if let Err(err) = paths.prepare() {
        eprintln!("command-capture: {err}");
        std::process::exit(FAILURE_EXIT_CODE);
    }
    if let Err(err) = diagnostics::init(&paths.diagnostics, config.quiet()) {
        eprintln!("command-capture: {err}");
        std::process::exit(FAILURE_EXIT_CODE);
    }

    let mut signals = match SignalBridge::install() {
        Ok(signals) => signals,
        Err(err) => {
            error!("failed to install signal handlers: {err}");
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };

    let session = CaptureSession::new(config, paths);
    let exit_code = tokio::select! {
        outcome = session.start() => match outcome {
            Ok(outcome) => outcome.exit_code,
            Err(err) => {
                error!("{err}");
                FAILURE_EXIT_CODE
            }
        },
        received = signals.recv() => signal::exit_code_for(received),
    };

    // Never return through the runtime: a pending stdin read would keep it alive.
    std::process::exit(exit_code);
}
