//! Turns SIGINT/SIGTERM aimed at the capture process into an orderly exit request.
//!
//! The child is neither signalled nor awaited: the capture process leaves with
//! [`SIGNAL_EXIT_CODE`] and the child keeps whatever signal its process group got.

use std::{fmt, io};

use tracing::info;

/// Exit code used when a termination signal ends the capture process; the same
/// generic failure code as a session that could not run.
pub const SIGNAL_EXIT_CODE: i32 = crate::FAILURE_EXIT_CODE;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
}

impl TerminationSignal {
    pub fn name(self) -> &'static str {
        match self {
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signal listeners registered up front, so a signal arriving while the child is
/// starting is not lost.
#[cfg(unix)]
pub struct SignalBridge {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalBridge {
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    pub async fn recv(&mut self) -> TerminationSignal {
        tokio::select! {
            _ = self.interrupt.recv() => TerminationSignal::Interrupt,
            _ = self.terminate.recv() => TerminationSignal::Terminate,
        }
    }
}

#[cfg(not(unix))]
pub struct SignalBridge {
    _private: (),
}

#[cfg(not(unix))]
impl SignalBridge {
    pub fn install() -> io::Result<Self> {
        Ok(Self { _private: () })
    }

    pub async fn recv(&mut self) -> TerminationSignal {
        match tokio::signal::ctrl_c().await {
            Ok(()) => TerminationSignal::Interrupt,
            Err(_) => std::future::pending().await,
        }
    }
}

/// Records the signal in the diagnostic log and returns the exit code to leave with.
pub fn exit_code_for(signal: TerminationSignal) -> i32 {
    info!("Received signal {signal}, exiting...");
    SIGNAL_EXIT_CODE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_map_to_fixed_nonzero_exit() {
        assert_eq!(exit_code_for(TerminationSignal::Interrupt), SIGNAL_EXIT_CODE);
        assert_eq!(exit_code_for(TerminationSignal::Terminate), SIGNAL_EXIT_CODE);
        assert_ne!(SIGNAL_EXIT_CODE, 0);
        assert_eq!(SIGNAL_EXIT_CODE, crate::FAILURE_EXIT_CODE);
    }

    #[test]
    fn names_match_posix_signals() {
        assert_eq!(TerminationSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(TerminationSignal::Terminate.to_string(), "SIGTERM");
    }
}
