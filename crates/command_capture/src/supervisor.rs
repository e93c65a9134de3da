use std::{
    path::PathBuf,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use tokio::{
    io::{AsyncRead, AsyncWrite},
    process::Command,
    task::{JoinError, JoinHandle},
    time::{self, Instant},
};
use tracing::{error, info, warn};

use crate::{
    config::CaptureConfig,
    record::Direction,
    relay::{Relay, RelayReport, RelayStop},
    session::SessionPaths,
    shutdown::ShutdownCoordinator,
    sink::TranscriptSink,
    CaptureError,
};

/// Extra time a cancelled relay gets to stop before its task is aborted.
const RELAY_STOP_GRACE: Duration = Duration::from_secs(1);

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// The parent-side ends of the three relays.
pub struct StdioEndpoints {
    input: BoxedReader,
    output: BoxedWriter,
    error: BoxedWriter,
}

impl StdioEndpoints {
    pub fn new<R, O, E>(input: R, output: O, error: E) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        O: AsyncWrite + Send + Unpin + 'static,
        E: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            error: Box::new(error),
        }
    }

    /// This process's own stdin, stdout and stderr.
    ///
    /// Reading stdin parks a blocking thread that only returns once a line or EOF
    /// arrives, so callers should leave with [`std::process::exit`] instead of waiting
    /// for the runtime to wind down.
    pub fn inherit() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout(), tokio::io::stderr())
    }
}

/// Result of a finished session.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub pid: Option<u32>,
    pub status: ExitStatus,
    /// Exit code the capture process should leave with.
    pub exit_code: i32,
    pub transcript_path: PathBuf,
    /// Stop reason of each relay, in stdin, stdout, stderr order.
    pub relays: Vec<RelayReport>,
}

/// One capture session: one child process, one transcript.
pub struct CaptureSession {
    config: CaptureConfig,
    paths: SessionPaths,
    stdio: StdioEndpoints,
}

impl CaptureSession {
    pub fn new(config: CaptureConfig, paths: SessionPaths) -> Self {
        Self {
            config,
            paths,
            stdio: StdioEndpoints::inherit(),
        }
    }

    /// Replaces the parent-side streams, e.g. with in-memory pipes.
    pub fn with_stdio(mut self, stdio: StdioEndpoints) -> Self {
        self.stdio = stdio;
        self
    }

    pub fn paths(&self) -> &SessionPaths {
        &self.paths
    }

    /// Runs the child to completion while relaying and recording its I/O.
    ///
    /// A non-zero or signal exit of the child is not an error; it is reported in the
    /// returned [`CaptureOutcome`].
    pub async fn start(self) -> Result<CaptureOutcome, CaptureError> {
        let CaptureSession {
            config,
            paths,
            stdio,
        } = self;

        let sink = TranscriptSink::open(&paths.transcript).await?;

        let mut command = Command::new(config.command());
        command
            .args(config.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                close_sink(&sink).await;
                return Err(CaptureError::Spawn {
                    binary: PathBuf::from(config.command()),
                    source,
                });
            }
        };

        let pid = child.id();
        info!(
            "Started process {} with PID {}",
            config.command().to_string_lossy(),
            pid.map_or_else(|| "unknown".to_string(), |pid| pid.to_string())
        );
        info!("IO logging to {}", paths.transcript.display());
        info!("Script logging to {}", paths.diagnostics.display());

        let pipes = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (child_stdin, child_stdout, child_stderr) = match pipes {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            (stdin, stdout, _) => {
                let _ = child.start_kill();
                close_sink(&sink).await;
                return Err(if stdin.is_none() {
                    CaptureError::StdinUnavailable
                } else if stdout.is_none() {
                    CaptureError::StdoutUnavailable
                } else {
                    CaptureError::StderrUnavailable
                });
            }
        };

        let input_shutdown = ShutdownCoordinator::new();
        let output_shutdown = ShutdownCoordinator::new();

        let stdin_task = tokio::spawn(
            Relay::new(
                stdio.input,
                child_stdin,
                Direction::In,
                sink.clone(),
                input_shutdown.signal(),
            )
            .close_destination(true)
            .run(),
        );
        let stdout_task = tokio::spawn(
            Relay::new(
                child_stdout,
                stdio.output,
                Direction::Out,
                sink.clone(),
                output_shutdown.signal(),
            )
            .run(),
        );
        let stderr_task = tokio::spawn(
            Relay::new(
                child_stderr,
                stdio.error,
                Direction::Err,
                sink.clone(),
                output_shutdown.signal(),
            )
            .run(),
        );

        let waited = child.wait().await;
        if let Ok(status) = &waited {
            info!("Process exited with {status}");
        }

        // Parent stdin never ends on its own; child output gets a bounded drain.
        input_shutdown.shutdown();
        let now = Instant::now();
        let drain_deadline = now + config.drain_timeout();
        let (stdin_report, stdout_report, stderr_report) = tokio::join!(
            join_relay(stdin_task, Direction::In, now, &input_shutdown),
            join_relay(stdout_task, Direction::Out, drain_deadline, &output_shutdown),
            join_relay(stderr_task, Direction::Err, drain_deadline, &output_shutdown),
        );

        close_sink(&sink).await;

        let status = waited.map_err(|source| CaptureError::Wait { source })?;
        Ok(CaptureOutcome {
            pid,
            exit_code: exit_code(&status),
            status,
            transcript_path: paths.transcript,
            relays: vec![stdin_report, stdout_report, stderr_report],
        })
    }
}

/// Waits for a relay, cancelling it at `cancel_at` and aborting it if it still has
/// not stopped shortly afterwards.
async fn join_relay(
    mut handle: JoinHandle<RelayReport>,
    direction: Direction,
    cancel_at: Instant,
    shutdown: &ShutdownCoordinator,
) -> RelayReport {
    tokio::select! {
        biased;
        joined = &mut handle => return relay_report(joined, direction),
        _ = time::sleep_until(cancel_at) => {}
    }

    if direction != Direction::In {
        warn!(
            "{} still open after child exit; cancelling relay",
            direction.stream_name()
        );
    }
    shutdown.shutdown();

    match time::timeout(RELAY_STOP_GRACE, &mut handle).await {
        Ok(joined) => relay_report(joined, direction),
        Err(_) => {
            handle.abort();
            warn!(
                "{} relay did not stop within {RELAY_STOP_GRACE:?}; aborted",
                direction.stream_name()
            );
            RelayReport {
                direction,
                stop: RelayStop::Cancelled,
                lines: 0,
            }
        }
    }
}

fn relay_report(joined: Result<RelayReport, JoinError>, direction: Direction) -> RelayReport {
    joined.unwrap_or_else(|err| {
        error!("{} relay task failed: {err}", direction.stream_name());
        RelayReport {
            direction,
            stop: RelayStop::Failed,
            lines: 0,
        }
    })
}

async fn close_sink(sink: &TranscriptSink) {
    // Records are flushed one by one, so a failed close loses nothing already written.
    if let Err(err) = sink.close().await {
        error!("Error closing transcript {}: {err}", sink.path().display());
    }
}

/// Maps a child exit status to this process's exit code.
///
/// A signal death becomes `128 + signal`, the shell convention.
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
