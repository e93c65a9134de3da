use std::{ffi::OsString, path::PathBuf};

use clap::Parser;
use command_capture::{CaptureConfig, DEFAULT_LOG_DIR};

#[derive(Debug, Parser)]
#[command(name = "command-capture")]
#[command(about = "Capture MCP server I/O to log file")]
pub struct Args {
    /// Directory to store log files.
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Suppress console output from this script.
    #[arg(long)]
    pub quiet: bool,

    /// Command to execute, followed by its arguments.
    ///
    /// Everything from the command onwards belongs to the child, including
    /// arguments that look like this tool's own flags.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Args {
    pub fn into_config(self) -> CaptureConfig {
        // clap enforces at least one value, so the command is never empty.
        let mut command = self.command.into_iter();
        let program = command.next().unwrap_or_default();
        CaptureConfig::builder(program)
            .args(command)
            .log_dir(self.log_dir)
            .quiet(self.quiet)
            .build()
    }
}
