// src/predictor/mod.rs
pub mod artifacts;
pub mod error;
pub mod listing;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod store;
pub mod transform;

#[cfg(test)]
pub mod testing;

use std::path::PathBuf;
use tracing::debug;

pub use error::{ArtifactLoadError, PredictError};
pub use listing::ListingInput;
pub use loader::ArtifactLoader;
pub use store::DirectoryStore;

/// Rent prediction service. Build one at startup and share it by reference.
pub struct RentPredictor {
    loader: ArtifactLoader,
}

impl RentPredictor {
    pub fn new(loader: ArtifactLoader) -> Self {
        Self { loader }
    }

    pub fn from_dir(model_dir: impl Into<PathBuf>) -> Self {
        Self::new(ArtifactLoader::new(DirectoryStore::new(model_dir)))
    }

    /// Loads the artifacts if that has not happened yet.
    pub fn ensure_loaded(&self) -> Result<(), ArtifactLoadError> {
        self.loader.ensure_loaded().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.loader.is_loaded()
    }

    pub fn artifact_location(&self) -> String {
        self.loader.location()
    }

    /// Predicted annual rent for one listing, in the model's currency.
    pub fn predict(&self, listing: &ListingInput) -> Result<f64, PredictError> {
        let bundle = self.loader.ensure_loaded()?;
        let rent = pipeline::predict(&bundle, listing)?;
        debug!(
            property_type = %listing.property_type,
            city = %listing.city,
            rent,
            "predicted rent"
        );
        Ok(rent)
    }
}
