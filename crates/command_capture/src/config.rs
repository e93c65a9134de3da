use std::{ffi::OsString, path::PathBuf, time::Duration};

/// Default directory for transcripts and diagnostic logs.
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// How long child output relays may keep draining after the child exits.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// What to run and where to record it.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub(crate) command: OsString,
    pub(crate) args: Vec<OsString>,
    pub(crate) log_dir: PathBuf,
    pub(crate) quiet: bool,
    pub(crate) drain_timeout: Duration,
}

impl CaptureConfig {
    pub fn builder(command: impl Into<OsString>) -> CaptureConfigBuilder {
        CaptureConfigBuilder::new(command)
    }

    pub fn command(&self) -> &OsString {
        &self.command
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn log_dir(&self) -> &PathBuf {
        &self.log_dir
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }
}

#[derive(Debug, Clone)]
pub struct CaptureConfigBuilder {
    command: OsString,
    args: Vec<OsString>,
    log_dir: PathBuf,
    quiet: bool,
    drain_timeout: Duration,
}

impl CaptureConfigBuilder {
    fn new(command: impl Into<OsString>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            quiet: false,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Suppresses the console copy of diagnostic messages.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn build(self) -> CaptureConfig {
        CaptureConfig {
            command: self.command,
            args: self.args,
            log_dir: self.log_dir,
            quiet: self.quiet,
            drain_timeout: self.drain_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = CaptureConfig::builder("server").build();
        assert_eq!(config.command(), "server");
        assert!(config.args().is_empty());
        assert_eq!(config.log_dir(), &PathBuf::from("./logs"));
        assert!(!config.quiet());
        assert_eq!(config.drain_timeout(), DEFAULT_DRAIN_TIMEOUT);
    }

    #[test]
    fn args_keep_their_order() {
        let config = CaptureConfig::builder("node")
            .arg("server.js")
            .args(["--port", "0"])
            .log_dir("/tmp/capture")
            .quiet(true)
            .build();
        assert_eq!(config.args(), ["server.js", "--port", "0"]);
        assert_eq!(config.log_dir(), &PathBuf::from("/tmp/capture"));
        assert!(config.quiet());
    }
}
