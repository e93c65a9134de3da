//! Cooperative cancellation shared between the supervisor and its relays.

use tokio::sync::watch;

/// Cloneable view of a shutdown request.
///
/// Unlike a one-shot broadcast, the flag is sticky: a relay that checks after the
/// request was issued still observes it.
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once shutdown has been requested.
    pub async fn recv(&self) {
        let mut receiver = self.receiver.clone();
        // The coordinator going away counts as a shutdown request too.
        let _ = receiver.wait_for(|triggered| *triggered).await;
    }
}

/// Issues shutdown requests to every [`ShutdownSignal`] it handed out.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    sender: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn shutdown(&self) {
        self.sender.send_replace(true);
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
