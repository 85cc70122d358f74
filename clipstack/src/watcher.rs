use crate::service::ServiceHandle;
use anyhow::{Context as _, Result};
use clipstack_history::ChangeDetector;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Read access to the live clipboard. `None` means "nothing readable right
/// now" and is treated as no change.
pub trait ClipboardSource {
    fn read_current_text(&mut self) -> Option<String>;
}

pub struct ArboardSource {
    clipboard: arboard::Clipboard,
}

impl ArboardSource {
    pub fn new() -> Result<Self> {
        let clipboard = arboard::Clipboard::new().context("failed to open system clipboard")?;
        Ok(ArboardSource { clipboard })
    }
}

impl ClipboardSource for ArboardSource {
    fn read_current_text(&mut self) -> Option<String> {
        self.clipboard.get_text().ok()
    }
}

/// Polls a [`ClipboardSource`] on a fixed interval and forwards detected
/// changes to the history service.
pub struct Watcher {
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl Watcher {
    pub fn spawn<S>(mut source: S, interval: Duration, handle: ServiceHandle) -> Self
    where
        S: ClipboardSource + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let join = tokio::spawn(async move {
            let mut detector = ChangeDetector::new();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if let Some(content) = detector.observe(source.read_current_text()) {
                            debug!("clipboard changed ({} bytes)", content.len());
                            if handle.ingest(content).await.is_err() {
                                warn!("history service unavailable, stopping watcher");
                                break;
                            }
                        }
                    }
                }
            }
            debug!("clipboard watcher stopped");
        });

        Watcher {
            shutdown: Some(stop_tx),
            join: Some(join),
        }
    }

    /// Idempotent. An in-flight tick may finish its ingest, but no new tick
    /// starts after this returns.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}
