// errors.rs
use astra::Response;
use thiserror::Error;

use crate::config::ConfigError;
use crate::predictor::PredictError;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB, model).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
