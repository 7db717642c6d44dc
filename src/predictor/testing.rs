// src/predictor/testing.rs
//
// Fixed artifact bundle shared by the predictor and router tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::predictor::artifacts::{ArtifactBundle, ArtifactKind};
use crate::predictor::error::ModelInferenceError;
use crate::predictor::listing::ListingInput;
use crate::predictor::model::Regressor;
use crate::predictor::store::{ArtifactStore, MemoryStore};

pub const FEATURE_COLUMNS: &str = r#"[
    "Beds", "Baths", "Age_of_listing_in_days", "Furnishing", "Log_Area",
    "Type_Apartment", "Type_Villa", "City_Abu Dhabi", "City_Dubai"
]"#;
pub const CONTINUOUS_COLUMNS: &str = r#"["Log_Area", "Beds", "Baths", "Age_of_listing_in_days"]"#;
pub const CATEGORICAL_COLUMNS: &str = r#"["Type", "City"]"#;
pub const SCALER: &str = r#"{
    "feature_names": ["Log_Area", "Beds", "Baths", "Age_of_listing_in_days"],
    "mean": [7.0, 2.0, 2.0, 10.0],
    "scale": [0.5, 1.0, 1.0, 5.0]
}"#;
pub const ENCODER: &str = r#"{
    "categories": [["Apartment", "Villa"], ["Abu Dhabi", "Dubai"]],
    "handle_unknown": "ignore"
}"#;
pub const FURNISH_MAP: &str = r#"{"Furnished": 1, "Unfurnished": 0}"#;
pub const LINEAR_MODEL: &str = r#"{
    "kind": "linear",
    "intercept": 10.0,
    "coefficients": [0.1, 0.05, -0.01, 0.2, 0.3, 0.15, 0.4, 0.05, 0.25]
}"#;

/// Rent the linear stub model yields for [`sample_listing`].
pub const SAMPLE_RENT: f64 = 34677.53247572212;

/// Stub artifacts with the model zstd-compressed, the rest plain.
pub fn stub_store() -> MemoryStore {
    stub_store_with_model(LINEAR_MODEL)
}

pub fn stub_store_with_model(model_json: &str) -> MemoryStore {
    let mut store = MemoryStore::default();
    let model = zstd::encode_all(Cursor::new(model_json.as_bytes()), 3).unwrap();

    store.insert(ArtifactKind::Model.file_name(), model);
    store.insert(ArtifactKind::Scaler.file_name(), SCALER.into());
    store.insert(ArtifactKind::Encoder.file_name(), ENCODER.into());
    store.insert(ArtifactKind::CategoricalColumns.file_name(), CATEGORICAL_COLUMNS.into());
    store.insert(ArtifactKind::ContinuousColumns.file_name(), CONTINUOUS_COLUMNS.into());
    store.insert(ArtifactKind::FeatureColumns.file_name(), FEATURE_COLUMNS.into());
    store.insert(ArtifactKind::FurnishMap.file_name(), FURNISH_MAP.into());
    store
}

pub fn stub_bundle() -> ArtifactBundle {
    ArtifactBundle::read_from(&stub_store()).unwrap()
}

/// Writes the stub artifacts into `dir` as files.
pub fn write_stub_artifacts(dir: &std::path::Path) {
    let store = stub_store();
    for kind in ArtifactKind::ALL {
        let bytes = store.read(kind.file_name()).unwrap();
        std::fs::write(dir.join(kind.file_name()), bytes).unwrap();
    }
}

pub fn sample_listing() -> ListingInput {
    ListingInput {
        area_sqft: 850.0,
        bedrooms: 2,
        bathrooms: 2,
        age_in_days: 7,
        furnishing: "Furnished".into(),
        property_type: "Apartment".into(),
        location: "Dubai Marina".into(),
        city: "Dubai".into(),
    }
}

/// Records every row it is asked to score and returns the first feature.
pub struct RecordingModel {
    pub width: usize,
    pub rows: Arc<parking_lot::Mutex<Vec<Vec<f64>>>>,
    pub calls: Arc<AtomicUsize>,
}

impl RecordingModel {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Arc::default(),
            calls: Arc::default(),
        }
    }
}

impl Regressor for RecordingModel {
    fn n_features(&self) -> usize {
        self.width
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelInferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().push(features.to_vec());
        Ok(features[0])
    }
}
