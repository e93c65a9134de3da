use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a capture session.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to create log directory `{path}`: {source}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open transcript `{path}`: {source}")]
    TranscriptOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write transcript: {0}")]
    TranscriptWrite(#[source] std::io::Error),
    #[error("transcript is already closed")]
    TranscriptClosed,
    #[error("command `{binary}` could not be spawned: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for child process: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
    #[error("child stdin unavailable")]
    StdinUnavailable,
    #[error("child stdout unavailable")]
    StdoutUnavailable,
    #[error("child stderr unavailable")]
    StderrUnavailable,
    #[error("failed to install diagnostic logger: {0}")]
    Diagnostics(String),
}

/// Failures local to a single relay. They stop that relay only.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed reading source: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed writing destination: {0}")]
    Write(#[source] std::io::Error),
    #[error(transparent)]
    Transcript(#[from] CaptureError),
}
