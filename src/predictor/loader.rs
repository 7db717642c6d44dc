// src/predictor/loader.rs
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{error, info};

use crate::predictor::artifacts::ArtifactBundle;
use crate::predictor::error::ArtifactLoadError;
use crate::predictor::store::ArtifactStore;

/// Loads the artifact bundle at most once and hands out shared references.
///
/// The first caller reads storage while holding `load_lock`; callers that
/// arrive meanwhile block on the lock and then find the published bundle.
/// A failed load publishes nothing, so the next caller tries again.
pub struct ArtifactLoader {
    store: Box<dyn ArtifactStore>,
    bundle: OnceLock<Arc<ArtifactBundle>>,
    load_lock: Mutex<()>,
}

impl ArtifactLoader {
    pub fn new(store: impl ArtifactStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            bundle: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.bundle.get().is_some()
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn ensure_loaded(&self) -> Result<Arc<ArtifactBundle>, ArtifactLoadError> {
        if let Some(bundle) = self.bundle.get() {
            return Ok(Arc::clone(bundle));
        }

        let _guard = self.load_lock.lock();
        if let Some(bundle) = self.bundle.get() {
            return Ok(Arc::clone(bundle));
        }

        let started = Instant::now();
        info!(location = %self.store.location(), "loading model artifacts");

        let bundle = match ArtifactBundle::read_from(self.store.as_ref()) {
            Ok(bundle) => Arc::new(bundle),
            Err(e) => {
                error!(location = %self.store.location(), error = %e, "failed to load model artifacts");
                return Err(e);
            }
        };

        let _ = self.bundle.set(Arc::clone(&bundle));
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            features = bundle.feature_columns.len(),
            "model artifacts loaded"
        );

        Ok(bundle)
    }
}
