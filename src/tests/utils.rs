use crate::auth::{sessions, MagicLinkService};
use crate::db::connection::{init_db, Database};
use crate::errors::ServerError;
use crate::predictor::store::MemoryStore;
use crate::predictor::testing::stub_store;
use crate::predictor::{ArtifactLoader, RentPredictor};
use crate::router::{handle, App};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

/// App over a fresh on-disk database and the stub model.
/// Keep the `TempDir` alive for the duration of the test.
pub fn test_app() -> (App, TempDir) {
    app_with(RentPredictor::new(ArtifactLoader::new(stub_store())))
}

/// App whose model directory is empty, so every prediction fails.
pub fn broken_model_app() -> (App, TempDir) {
    app_with(RentPredictor::new(ArtifactLoader::new(MemoryStore::default())))
}

fn app_with(predictor: RentPredictor) -> (App, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("test.sqlite3").display().to_string());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    let app = App {
        db,
        predictor: Arc::new(predictor),
        magic: MagicLinkService::default(),
    };
    (app, dir)
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Signs `email` in directly and returns the raw session token.
pub fn login(app: &App, email: &str) -> (i64, String) {
    let now = now_unix();
    app.db
        .with_conn(|conn| {
            let issued = app.magic.request_link(conn, email, now)?;
            let redeemed = app.magic.redeem(conn, &issued.token, now)?;
            let token = sessions::create_session(conn, redeemed.user_id, now)?;
            Ok::<_, ServerError>((redeemed.user_id, token))
        })
        .expect("login failed")
}

pub fn get(app: &App, uri: &str, session: Option<&str>) -> Response {
    send(app, Method::GET, uri, session, Vec::new())
}

pub fn post_form(app: &App, uri: &str, body: &str, session: Option<&str>) -> Response {
    send(app, Method::POST, uri, session, body.as_bytes().to_vec())
}

pub fn send(app: &App, method: Method, uri: &str, session: Option<&str>, body: Vec<u8>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if !body.is_empty() {
        builder = builder.header("Content-Type", "application/x-www-form-urlencoded");
    }
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("theme=dark; session={token}"));
    }
    let req = builder.body(Body::from(body)).unwrap();

    match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => crate::templates::html_error_response(err),
    }
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn header(resp: &Response, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub fn count_predictions(app: &App) -> i64 {
    app.db
        .with_conn(|conn| {
            conn.query_row("select count(*) from predictions", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap()
}

pub const VALID_FORM: &str = "area_in_sqft=850&beds=2&baths=2&age_of_listing_in_days=7\
    &furnishing=Furnished&type=Apartment&location=Dubai+Marina&city=Dubai";
