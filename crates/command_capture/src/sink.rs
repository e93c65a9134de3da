use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};

use crate::{record::LogRecord, CaptureError};

/// Append-only transcript file shared by every relay of a session.
///
/// Each record is written with one `write_all` under the lock and flushed before the
/// lock is released, so records never tear and survive a crash of this process.
#[derive(Debug, Clone)]
pub struct TranscriptSink {
    path: PathBuf,
    file: Arc<Mutex<Option<fs::File>>>,
}

impl TranscriptSink {
    /// Creates (or truncates) the transcript at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|source| CaptureError::TranscriptOpen {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file: Arc::new(Mutex::new(Some(file))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &LogRecord) -> Result<(), CaptureError> {
        let bytes = record.to_bytes();
        let mut guard = self.file.lock().await;
        let file = guard.as_mut().ok_or(CaptureError::TranscriptClosed)?;
        file.write_all(&bytes)
            .await
            .map_err(CaptureError::TranscriptWrite)?;
        file.flush().await.map_err(CaptureError::TranscriptWrite)
    }

    /// Flushes and releases the file handle. Only the first call does any work.
    pub async fn close(&self) -> Result<(), CaptureError> {
        let file = self.file.lock().await.take();
        match file {
            Some(mut file) => {
                file.flush().await.map_err(CaptureError::TranscriptWrite)?;
                file.sync_data().await.map_err(CaptureError::TranscriptWrite)
            }
            None => Ok(()),
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.file.lock().await.is_none()
    }
}
