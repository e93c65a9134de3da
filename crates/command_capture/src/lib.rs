#![forbid(unsafe_code)]
//! Transparent stdio interceptor for a single child process.
//!
//! A [`CaptureSession`] spawns the child with piped stdin/stdout/stderr, relays each stream
//! unmodified to or from this process's own stdio, and records every line it relays in a
//! transcript file:
//!
//! ```text
//! [2024-01-01 00:00:00.000] IN: {"jsonrpc":"2.0","id":1,"method":"initialize"}
//! [2024-01-01 00:00:00.004] OUT: {"jsonrpc":"2.0","id":1,"result":{}}
//! [2024-01-01 00:00:00.005] ERR: server ready
//! ```
//!
//! Records from one stream keep their arrival order; records from different streams
//! interleave in best-effort wall-clock order. Content is never interpreted beyond
//! splitting on `\n` for the transcript.
//!
//! ```rust,no_run
//! use command_capture::{CaptureConfig, CaptureSession, SessionPaths};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CaptureConfig::builder("npx")
//!     .args(["-y", "@modelcontextprotocol/server-everything"])
//!     .log_dir("./logs")
//!     .build();
//! let paths = SessionPaths::now(config.log_dir());
//! paths.prepare()?;
//! let outcome = CaptureSession::new(config, paths).start().await?;
//! std::process::exit(outcome.exit_code);
//! # }
//! ```

mod config;
pub mod diagnostics;
mod error;
mod record;
mod relay;
mod session;
pub mod shutdown;
pub mod signal;
mod sink;
mod supervisor;

pub use config::{CaptureConfig, CaptureConfigBuilder, DEFAULT_DRAIN_TIMEOUT, DEFAULT_LOG_DIR};
pub use error::{CaptureError, RelayError};
pub use record::{Direction, LogRecord, RECORD_TIMESTAMP_FORMAT};
pub use relay::{Relay, RelayReport, RelayStop};
pub use session::{SessionPaths, SESSION_TIMESTAMP_FORMAT};
pub use signal::{SignalBridge, TerminationSignal, SIGNAL_EXIT_CODE};
pub use sink::TranscriptSink;
pub use supervisor::{exit_code, CaptureOutcome, CaptureSession, StdioEndpoints};

/// Exit code used when the session fails before the child's status is known.
pub const FAILURE_EXIT_CODE: i32 = 1;
