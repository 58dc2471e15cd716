use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to at most one pending "reveal" message.
///
/// Scheduling replaces (and aborts) whatever was pending before, so only the
/// latest page update can ever reveal the comics.
#[derive(Default)]
pub struct RevealTimer {
    pending: Option<JoinHandle<()>>,
}

impl RevealTimer {
    pub fn schedule<T: Send + 'static>(
        &mut self,
        delay: Duration,
        tx: mpsc::UnboundedSender<T>,
        message: T,
    ) {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(message);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RevealTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
