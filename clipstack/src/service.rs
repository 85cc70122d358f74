use anyhow::{Result, anyhow};
use clipstack_history::{Entry, EntryId, HistoryStore};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

/// Commands applied by the single writer, strictly in arrival order
enum Command {
    Ingest(String),
    TogglePin(EntryId, oneshot::Sender<bool>),
    Delete(EntryId, oneshot::Sender<bool>),
    List(oneshot::Sender<Vec<Entry>>),
    Search(String, oneshot::Sender<Vec<Entry>>),
}

/// Single-writer owner of a [`HistoryStore`].
///
/// All mutations are serialized through one task; readers receive replies
/// that reflect a strict prefix of the applied mutations. Persistence
/// failures are logged and recovered (the attempted mutation is abandoned,
/// the view keeps its last good state); they never take the task down.
pub struct HistoryService {
    handle: ServiceHandle,
    join: tokio::task::JoinHandle<()>,
}

#[derive(Clone)]
pub struct ServiceHandle {
    tx: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Vec<Entry>>,
}

impl HistoryService {
    pub fn spawn(mut store: HistoryStore) -> Self {
        let (tx, mut rx) = mpsc::channel(64);
        let (snap_tx, snap_rx) = watch::channel(store.list().to_vec());

        let join = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Ingest(content) => match store.ingest(&content) {
                        Ok(outcome) => {
                            debug!("ingest outcome {:?}", outcome);
                            let _ = snap_tx.send(store.list().to_vec());
                        }
                        Err(err) => warn!("ingest abandoned: {}", err),
                    },
                    Command::TogglePin(id, reply) => {
                        let toggled = match store.toggle_pin(&id) {
                            Ok(toggled) => toggled,
                            Err(err) => {
                                warn!("pin toggle abandoned: {}", err);
                                false
                            }
                        };
                        if toggled {
                            let _ = snap_tx.send(store.list().to_vec());
                        }
                        let _ = reply.send(toggled);
                    }
                    Command::Delete(id, reply) => {
                        let deleted = match store.delete(&id) {
                            Ok(deleted) => deleted,
                            Err(err) => {
                                warn!("delete abandoned: {}", err);
                                false
                            }
                        };
                        if deleted {
                            let _ = snap_tx.send(store.list().to_vec());
                        }
                        let _ = reply.send(deleted);
                    }
                    Command::List(reply) => {
                        let _ = reply.send(store.list().to_vec());
                    }
                    Command::Search(query, reply) => {
                        let _ = reply.send(store.search(&query));
                    }
                }
            }
            debug!("history service stopped");
        });

        HistoryService {
            handle: ServiceHandle {
                tx,
                snapshots: snap_rx,
            },
            join,
        }
    }

    pub fn handle(&self) -> ServiceHandle {
        self.handle.clone()
    }

    /// Stop accepting commands and wait for the writer to drain.
    /// Handles cloned elsewhere must be dropped first for this to resolve.
    pub async fn shutdown(self) {
        drop(self.handle);
        let _ = self.join.await;
    }
}

impl ServiceHandle {
    pub async fn ingest(&self, content: impl Into<String>) -> Result<()> {
        self.tx
            .send(Command::Ingest(content.into()))
            .await
            .map_err(|_| anyhow!("history service stopped"))
    }

    pub async fn toggle_pin(&self, id: EntryId) -> Result<bool> {
        self.request(|reply| Command::TogglePin(id, reply)).await
    }

    pub async fn delete(&self, id: EntryId) -> Result<bool> {
        self.request(|reply| Command::Delete(id, reply)).await
    }

    pub async fn list(&self) -> Result<Vec<Entry>> {
        self.request(Command::List).await
    }

    pub async fn search(&self, query: impl Into<String>) -> Result<Vec<Entry>> {
        let query = query.into();
        self.request(|reply| Command::Search(query, reply)).await
    }

    /// Change notifications: yields a fresh snapshot after every applied
    /// mutation, with no UI framework in sight
    pub fn subscribe(&self) -> watch::Receiver<Vec<Entry>> {
        self.snapshots.clone()
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| anyhow!("history service stopped"))?;
        reply_rx
            .await
            .map_err(|_| anyhow!("history service dropped the request"))
    }
}
