// src/predictor/error.rs
use std::io;
use thiserror::Error;

use crate::predictor::artifacts::ArtifactKind;

/// Reading or decoding one of the seven fitted artifacts failed.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact `{file}` ({kind}) could not be read: {source}")]
    Read {
        kind: ArtifactKind,
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("artifact `{file}` ({kind}) could not be decompressed: {source}")]
    Decompress {
        kind: ArtifactKind,
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("artifact `{file}` ({kind}) could not be decoded: {source}")]
    Decode {
        kind: ArtifactKind,
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {kind} is inconsistent: {reason}")]
    Inconsistent { kind: ArtifactKind, reason: String },
}

/// The artifact schema and the columns built from a listing disagree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureSchemaError {
    #[error("feature column `{0}` is not produced by any preprocessing step")]
    MissingColumn(String),

    #[error("column `{0}` is produced but absent from the feature columns")]
    UnexpectedColumn(String),

    #[error("column `{0}` is listed twice")]
    DuplicateColumn(String),

    #[error("categorical column `{0}` is not a text attribute of a listing")]
    NotCategorical(String),

    #[error("continuous column `{0}` is not a numeric attribute of a listing")]
    NotContinuous(String),

    #[error("feature column `{0}` is not numeric after preprocessing")]
    NonNumeric(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureValueError {
    #[error("area must be a finite, non-negative number of square feet (got {0})")]
    InvalidArea(f64),

    #[error("category `{value}` was not seen for column `{column}` during training")]
    UnknownCategory { column: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelInferenceError {
    #[error("model expects {expected} features, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("tree {tree} has no node {node}")]
    BrokenTree { tree: usize, node: usize },
}

/// Everything `RentPredictor::predict` can fail with. Each kind is kept distinct
/// so the request layer can report them separately.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactLoadError),

    #[error(transparent)]
    FeatureValue(#[from] FeatureValueError),

    #[error(transparent)]
    FeatureSchema(#[from] FeatureSchemaError),

    #[error("model inference failed: {0}")]
    ModelInference(#[from] ModelInferenceError),
}
