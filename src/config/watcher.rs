//! Route file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouteFile;

/// Watches a route file and sends every successfully reloaded version.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouteFile>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for reloaded route files.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouteFile>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(path = ?path, "Route file changed, reloading");
                    match load_config(&path) {
                        Ok(routes) => {
                            if tx.send(routes).is_err() {
                                tracing::debug!("Route file receiver dropped");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload routes, keeping current router");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?self.path, "Route file watcher started");
        Ok(watcher)
    }
}
