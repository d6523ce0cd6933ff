//! Source file watcher for hot reload of the snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::source::service::OlympicService;

/// A watcher that monitors the payload file for changes.
pub struct SourceWatcher {
    path: PathBuf,
    reload_tx: mpsc::UnboundedSender<()>,
}

impl SourceWatcher {
    /// Create a new SourceWatcher.
    ///
    /// Returns the watcher and a receiver that yields one message per change.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (reload_tx, reload_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                reload_tx,
            },
            reload_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The parent directory is watched rather than the file itself, so
    /// editors that save by renaming a temp file over it keep triggering
    /// reloads. The returned watcher must be kept alive for events to flow.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.reload_tx.clone();
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| notify::Error::generic("source path has no file name"))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_source = event
                        .paths
                        .iter()
                        .any(|path| path.file_name() == Some(file_name.as_os_str()));
                    if touches_source && (event.kind.is_modify() || event.kind.is_create()) {
                        tracing::info!(paths = ?event.paths, "Source file change detected");
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Source watcher started");
        Ok(watcher)
    }
}

/// Reload the service for every change notification until shutdown.
///
/// Bursts of notifications (editors often emit several per save) collapse
/// into a single reload.
pub async fn drive_reloads(
    service: Arc<OlympicService>,
    mut changes: mpsc::UnboundedReceiver<()>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            change = changes.recv() => {
                if change.is_none() {
                    break;
                }
                while changes.try_recv().is_ok() {}
                let snapshot = service.reload().await;
                tracing::info!(countries = snapshot.len(), "Snapshot reloaded after source change");
            }
            _ = shutdown.recv() => {
                tracing::info!("Source watcher received shutdown signal, exiting loop");
                break;
            }
        }
    }
}
