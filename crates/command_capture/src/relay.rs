use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error};

use crate::{
    error::RelayError,
    record::{Direction, LogRecord},
    shutdown::ShutdownSignal,
    sink::TranscriptSink,
};

/// Why a relay stopped.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RelayStop {
    /// The source reached end-of-stream.
    Eof,
    /// Session shutdown was observed before the source ended.
    Cancelled,
    /// An I/O error ended the relay; remaining data on this stream is not relayed.
    Failed,
}

/// Summary returned by [`Relay::run`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RelayReport {
    pub direction: Direction,
    pub stop: RelayStop,
    pub lines: usize,
}

/// Unidirectional pump that copies `source` to `destination` line by line and
/// mirrors every line into the transcript.
pub struct Relay<R, W> {
    source: BufReader<R>,
    destination: W,
    direction: Direction,
    sink: TranscriptSink,
    shutdown: ShutdownSignal,
    close_destination: bool,
}

impl<R, W> Relay<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        source: R,
        destination: W,
        direction: Direction,
        sink: TranscriptSink,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            source: BufReader::new(source),
            destination,
            direction,
            sink,
            shutdown,
            close_destination: false,
        }
    }

    /// Shut down the destination's write side when the relay stops, so the reader on
    /// the other end sees end-of-input.
    pub fn close_destination(mut self, enabled: bool) -> Self {
        self.close_destination = enabled;
        self
    }

    pub async fn run(mut self) -> RelayReport {
        let mut lines = 0;
        let stop = match self.pump(&mut lines).await {
            Ok(stop) => stop,
            Err(err) => {
                error!("Error handling {}: {err}", self.direction.stream_name());
                RelayStop::Failed
            }
        };

        if self.close_destination {
            if let Err(err) = self.destination.shutdown().await {
                if err.kind() != std::io::ErrorKind::BrokenPipe {
                    debug!(
                        stream = self.direction.stream_name(),
                        "closing destination failed: {err}"
                    );
                }
            }
        }

        debug!(
            stream = self.direction.stream_name(),
            ?stop,
            lines,
            "relay stopped"
        );
        RelayReport {
            direction: self.direction,
            stop,
            lines,
        }
    }

    async fn pump(&mut self, lines: &mut usize) -> Result<RelayStop, RelayError> {
        let mut line = Vec::new();
        loop {
            if self.shutdown.is_triggered() {
                return Ok(RelayStop::Cancelled);
            }

            line.clear();
            let read = tokio::select! {
                biased;
                _ = self.shutdown.recv() => return Ok(RelayStop::Cancelled),
                read = self.source.read_until(b'\n', &mut line) => read.map_err(RelayError::Read)?,
            };
            if read == 0 {
                return Ok(RelayStop::Eof);
            }

            let record = LogRecord::capture(self.direction, &line);
            self.sink.append(&record).await?;

            self.destination
                .write_all(&line)
                .await
                .map_err(RelayError::Write)?;
            self.destination.flush().await.map_err(RelayError::Write)?;
            *lines += 1;
        }
    }
}
