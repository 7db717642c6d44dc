use crate::auth::MagicLinkService;
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::predictor::RentPredictor;
use crate::router::{handle, App};
use astra::Server;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod forms;
mod predictor;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let db = Database::new(cfg.database_path.clone());
    if let Err(e) = init_db(&db, &cfg.schema_path) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    // A model directory that does not load is fatal at startup.
    let predictor = Arc::new(RentPredictor::from_dir(&cfg.model_dir));
    if let Err(e) = predictor.ensure_loaded() {
        error!(error = %e, model_dir = %cfg.model_dir.display(), "model artifacts failed to load");
        std::process::exit(1);
    }
    info!(model_dir = %predictor.artifact_location(), "model ready");

    let app = App {
        db,
        predictor,
        magic: MagicLinkService::default(),
    };

    info!(addr = %cfg.bind_addr, workers = cfg.max_workers, "starting server");
    let server = Server::bind(cfg.bind_addr).max_workers(cfg.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => templates::html_error_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    info!("server shut down");
}
