// src/predictor/artifacts.rs
use serde::de::DeserializeOwned;
use std::fmt;
use std::io::Cursor;
use tracing::{debug, error};

use crate::predictor::error::{ArtifactLoadError, FeatureSchemaError};
use crate::predictor::model::{ModelArtifact, Regressor};
use crate::predictor::schema::FeatureLayout;
use crate::predictor::store::ArtifactStore;
use crate::predictor::transform::{FurnishMap, OneHotEncoder, StandardScaler};

/// First four bytes of every zstd frame.
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
    Encoder,
    CategoricalColumns,
    ContinuousColumns,
    FeatureColumns,
    FurnishMap,
}

impl ArtifactKind {
    /// Read order.
    pub const ALL: [ArtifactKind; 7] = [
        ArtifactKind::Model,
        ArtifactKind::Scaler,
        ArtifactKind::Encoder,
        ArtifactKind::CategoricalColumns,
        ArtifactKind::ContinuousColumns,
        ArtifactKind::FeatureColumns,
        ArtifactKind::FurnishMap,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Model => "best_model.json.zst",
            ArtifactKind::Scaler => "scaler.json",
            ArtifactKind::Encoder => "encoder.json",
            ArtifactKind::CategoricalColumns => "categorical_cols.json",
            ArtifactKind::ContinuousColumns => "continuous_cols.json",
            ArtifactKind::FeatureColumns => "feature_columns.json",
            ArtifactKind::FurnishMap => "furnish_map.json",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::Encoder => "encoder",
            ArtifactKind::CategoricalColumns => "categorical columns",
            ArtifactKind::ContinuousColumns => "continuous columns",
            ArtifactKind::FeatureColumns => "feature columns",
            ArtifactKind::FurnishMap => "furnish map",
        };
        f.write_str(name)
    }
}

/// Reads one artifact and decodes it, decompressing first when the bytes
/// carry a zstd frame header.
pub fn read_artifact<T: DeserializeOwned>(
    store: &dyn ArtifactStore,
    kind: ArtifactKind,
) -> Result<T, ArtifactLoadError> {
    let file = kind.file_name().to_string();

    let raw = store.read(kind.file_name()).map_err(|source| ArtifactLoadError::Read {
        kind,
        file: file.clone(),
        source,
    })?;

    let bytes = if raw.starts_with(&ZSTD_MAGIC) {
        debug!(artifact = %kind, compressed_len = raw.len(), "decompressing artifact");
        zstd::decode_all(Cursor::new(raw)).map_err(|source| ArtifactLoadError::Decompress {
            kind,
            file: file.clone(),
            source,
        })?
    } else {
        raw
    };

    serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Decode { kind, file, source })
}

/// Everything the pipeline needs, immutable once built.
pub struct ArtifactBundle {
    pub model: Box<dyn Regressor>,
    pub scaler: StandardScaler,
    pub encoder: OneHotEncoder,
    pub categorical_columns: Vec<String>,
    pub continuous_columns: Vec<String>,
    pub feature_columns: Vec<String>,
    pub furnish_map: FurnishMap,
    layout: Result<FeatureLayout, FeatureSchemaError>,
}

impl fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("model_features", &self.model.n_features())
            .field("categorical_columns", &self.categorical_columns)
            .field("continuous_columns", &self.continuous_columns)
            .field("feature_columns", &self.feature_columns)
            .field("layout", &self.layout)
            .finish()
    }
}

/// Artifacts as decoded, before cross-checking.
pub struct BundleParts {
    pub model: Box<dyn Regressor>,
    pub scaler: StandardScaler,
    pub encoder: OneHotEncoder,
    pub categorical_columns: Vec<String>,
    pub continuous_columns: Vec<String>,
    pub feature_columns: Vec<String>,
    pub furnish_map: FurnishMap,
}

impl ArtifactBundle {
    /// Reads all seven artifacts from `store`. Nothing is returned unless
    /// every artifact decodes.
    pub fn read_from(store: &dyn ArtifactStore) -> Result<Self, ArtifactLoadError> {
        let model: ModelArtifact = read_artifact(store, ArtifactKind::Model)?;
        let scaler = read_artifact(store, ArtifactKind::Scaler)?;
        let encoder = read_artifact(store, ArtifactKind::Encoder)?;
        let categorical_columns = read_artifact(store, ArtifactKind::CategoricalColumns)?;
        let continuous_columns = read_artifact(store, ArtifactKind::ContinuousColumns)?;
        let feature_columns: Vec<String> = read_artifact(store, ArtifactKind::FeatureColumns)?;
        let furnish_map = read_artifact(store, ArtifactKind::FurnishMap)?;

        let model = model
            .resolve(&feature_columns)
            .map_err(|reason| ArtifactLoadError::Inconsistent {
                kind: ArtifactKind::Model,
                reason,
            })?;

        Self::new(BundleParts {
            model: Box::new(model),
            scaler,
            encoder,
            categorical_columns,
            continuous_columns,
            feature_columns,
            furnish_map,
        })
    }

    /// Cross-checks the parts. Per-artifact inconsistencies are load errors;
    /// a column contract that does not line up is kept and reported by
    /// every prediction.
    pub fn new(parts: BundleParts) -> Result<Self, ArtifactLoadError> {
        parts
            .scaler
            .check(&parts.continuous_columns)
            .map_err(|reason| ArtifactLoadError::Inconsistent {
                kind: ArtifactKind::Scaler,
                reason,
            })?;

        parts
            .encoder
            .check(&parts.categorical_columns)
            .map_err(|reason| ArtifactLoadError::Inconsistent {
                kind: ArtifactKind::Encoder,
                reason,
            })?;

        if parts.model.n_features() != parts.feature_columns.len() {
            return Err(ArtifactLoadError::Inconsistent {
                kind: ArtifactKind::Model,
                reason: format!(
                    "model takes {} features but {} feature columns are listed",
                    parts.model.n_features(),
                    parts.feature_columns.len()
                ),
            });
        }

        let layout = FeatureLayout::compile(
            &parts.categorical_columns,
            &parts.continuous_columns,
            &parts.encoder,
            &parts.feature_columns,
        );
        if let Err(e) = &layout {
            error!(error = %e, "artifact bundle column contract is broken; predictions will fail");
        }

        Ok(Self {
            model: parts.model,
            scaler: parts.scaler,
            encoder: parts.encoder,
            categorical_columns: parts.categorical_columns,
            continuous_columns: parts.continuous_columns,
            feature_columns: parts.feature_columns,
            furnish_map: parts.furnish_map,
            layout,
        })
    }

    pub fn layout(&self) -> Result<&FeatureLayout, FeatureSchemaError> {
        self.layout.as_ref().map_err(|e| e.clone())
    }
}
