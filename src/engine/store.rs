//! Shared handle to the current engine.
//!
//! Dispatches take a snapshot with [`EngineStore::current`] and keep it for
//! their whole run, so a reload never changes the tree under an invocation
//! that already started.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::ConfigError;
use crate::engine::Engine;

#[derive(Clone)]
pub struct EngineStore {
    inner: Arc<RwLock<Arc<Engine>>>,
}

impl EngineStore {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(engine))),
        }
    }

    /// Snapshot of the current engine.
    pub fn current(&self) -> Arc<Engine> {
        self.inner.read().clone()
    }

    /// Swap in a new engine wholesale.
    pub fn replace(&self, engine: Engine) {
        let root = engine.tree().root().name.clone();
        *self.inner.write() = Arc::new(engine);
        tracing::info!(root = %root, "Engine replaced");
    }

    /// Build a new engine and swap it in.
    ///
    /// On failure the current engine stays in place and the error is returned.
    pub fn reload<F>(&self, build: F) -> Result<(), ConfigError>
    where
        F: FnOnce() -> Result<Engine, ConfigError>,
    {
        match build() {
            Ok(engine) => {
                self.replace(engine);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Engine reload failed, keeping current engine");
                Err(err)
            }
        }
    }
}
