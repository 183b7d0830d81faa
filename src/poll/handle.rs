use std::sync::atomic::Ordering;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::engine::Engine;
use crate::error::PollError;
use crate::proxy::Transport;
use crate::telemetry::{self};
use crate::telemetry::ops::poll::Phase as PollPhase;

/// Owner of a running polling loop.
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    #[cfg(test)]
    pub fn is_finished(&self) -> bool { self.task.is_finished() }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

impl<T: Transport> Engine<T> {
    /// Start the background loop: a cycle, then `poll_interval` of sleep, forever.
    /// At most one loop runs per engine.
    pub fn spawn_polling(&self) -> Result<PollHandle, PollError> {
        if self.inner.polling.swap(true, Ordering::SeqCst) {
            return Err(PollError::AlreadyRunning);
        }
        let cancel = CancellationToken::new();
        let engine = self.clone();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            engine.run_polling(token).await;
            engine.inner.polling.store(false, Ordering::SeqCst);
        });
        Ok(PollHandle { cancel, task })
    }

    async fn run_polling(&self, cancel: CancellationToken) {
        let log = telemetry::poll();
        let interval = self.config().poll_interval;
        let span = log.root_span_kv([("interval_secs", interval.as_secs().to_string())]);
        async {
            loop {
                // delay counts from the end of the cycle, so drift accumulates
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = self.poll_once().instrument(log.span(&PollPhase::Cycle)) => {}
                }
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval).instrument(log.span(&PollPhase::Sleep)) => {}
                }
            }
            log.info("polling stopped");
        }
        .instrument(span)
        .await
    }
}
