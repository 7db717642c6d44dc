use crate::errors::ServerError;
use crate::predictor::PredictError;
use crate::templates::desktop_layout;
use astra::{Body, Response, ResponseBuilder};
use maud::html;
use tracing::{error, warn};

/// Status code and user-facing message for an error.
pub fn status_and_message(err: &ServerError) -> (u16, String) {
    match err {
        ServerError::NotFound => (404, "Not Found".into()),
        ServerError::BadRequest(msg) => (400, msg.clone()),
        ServerError::Unauthorized(msg) => (401, msg.clone()),
        ServerError::DbError(_) => (500, "Database Error".into()),
        ServerError::XlsxError(_) => (500, "Spreadsheet Error".into()),
        ServerError::Prediction(e) => (500, prediction_message(e)),
        ServerError::Config(_) | ServerError::InternalError => {
            (500, "Internal Server Error".into())
        }
    }
}

fn prediction_message(err: &PredictError) -> String {
    match err {
        PredictError::FeatureValue(e) => format!("Prediction failed: {e}"),
        PredictError::ArtifactLoad(_) => "Prediction failed: the model is unavailable.".into(),
        PredictError::FeatureSchema(_) | PredictError::ModelInference(_) => {
            "Prediction failed: the model could not score this listing.".into()
        }
    }
}

/// Convert a ServerError into a proper HTML response page
pub fn html_error_response(err: ServerError) -> Response {
    let (status, message) = status_and_message(&err);
    if status >= 500 {
        error!(status, error = %err, "request failed");
    } else {
        warn!(status, error = %err, "request rejected");
    }

    let page = desktop_layout(
        &format!("Error {status}"),
        None,
        html! {
            main {
                h1 { "Error " (status) }
                p { (message) }
                p { a href="/" { "← Back to home" } }
            }
        },
    );

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(page.into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
