use crate::auth::sessions::{self, clear_session_cookie, session_cookie, SESSION_COOKIE};
use crate::auth::{CurrentUser, MagicLinkService};
use crate::db::predictions;
use crate::db::Database;
use crate::domain::{choices, NewPrediction};
use crate::errors::{ResultResp, ServerError};
use crate::forms::{self, PredictionForm};
use crate::predictor::RentPredictor;
use crate::responses::{html_response, json_response, redirect, redirect_with_cookie, xlsx_response};
use crate::spreadsheets::predictions_workbook;
use crate::templates::pages::{self, Notice, Outcome};
use astra::Request;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info};

const MAX_FORM_BYTES: u64 = 64 * 1024;
const RECENT_LOCATIONS: u32 = 20;

/// Everything a request handler needs, shared across workers.
pub struct App {
    pub db: Database,
    pub predictor: Arc<RentPredictor>,
    pub magic: MagicLinkService,
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => {
            let user = current_user(&req, &app.db)?;
            let locations = location_suggestions(app, user.as_ref())?;
            html_response(pages::home_page(
                user.as_ref(),
                &PredictionForm::default(),
                &locations,
                Outcome::Blank,
            ))
        }
        ("POST", "/predict") => predict(req, app),

        ("GET", "/history") => history(req, app),
        ("POST", "/remove") => remove(req, app),
        ("GET", "/history/export") => export(req, app),

        ("GET", "/login") => html_response(pages::login_page()),
        ("POST", "/auth/request-link") => request_link(req, app),
        ("GET", "/auth/magic") => redeem_link(req, app),
        ("POST", "/logout") => logout(req, app),

        ("GET", "/health") => health(app),
        _ => Err(ServerError::NotFound),
    }
}

fn predict(req: Request, app: &App) -> ResultResp {
    let user = current_user(&req, &app.db)?;
    let form = PredictionForm::from_fields(&read_form(req)?);

    let listing = match form.validate() {
        Ok(listing) => listing,
        Err(errors) => {
            debug!(invalid = errors.len(), "prediction form rejected");
            let locations = location_suggestions(app, user.as_ref())?;
            return html_response(pages::home_page(
                user.as_ref(),
                &form,
                &locations,
                Outcome::Invalid(&errors),
            ));
        }
    };

    let rent = app.predictor.predict(&listing)?;

    let record = NewPrediction {
        user_id: user.as_ref().map(|u| u.id),
        listing,
        predicted_rent: rent,
        created_at: now_unix(),
    };
    let id = app
        .db
        .with_conn(|conn| predictions::insert_prediction(conn, &record))?;
    info!(id, user_id = ?record.user_id, rent, "prediction stored");

    let locations = location_suggestions(app, user.as_ref())?;
    html_response(pages::home_page(
        user.as_ref(),
        &form,
        &locations,
        Outcome::Predicted(rent),
    ))
}

fn history(req: Request, app: &App) -> ResultResp {
    let Some(user) = current_user(&req, &app.db)? else {
        return redirect("/login");
    };
    let params = parse_query(&req);
    let query = forms::history_query(&params);
    let notice = params.get("notice").and_then(|n| Notice::from_key(n));

    let page = app
        .db
        .with_conn(|conn| predictions::list_predictions(conn, user.id, &query))?;

    html_response(pages::history_page(&user, &query, &page, notice))
}

fn remove(req: Request, app: &App) -> ResultResp {
    let Some(user) = current_user(&req, &app.db)? else {
        return redirect("/login");
    };
    let fields = read_form(req)?;
    let id: i64 = fields
        .get("id")
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| ServerError::BadRequest("missing or invalid prediction id".into()))?;

    let deleted = app
        .db
        .with_conn(|conn| predictions::delete_prediction_for_user(conn, id, user.id))?;

    let notice = if deleted {
        info!(id, user_id = user.id, "prediction deleted");
        Notice::Deleted
    } else {
        Notice::NotFound
    };
    redirect(&format!("/history?notice={}", notice.key()))
}

fn export(req: Request, app: &App) -> ResultResp {
    let Some(user) = current_user(&req, &app.db)? else {
        return redirect("/login");
    };
    let query = forms::history_query(&parse_query(&req));

    let records = app
        .db
        .with_conn(|conn| predictions::list_all_predictions(conn, user.id, &query))?;
    let buffer = predictions_workbook(&records)?;

    xlsx_response(buffer, "predictions.xlsx")
}

fn request_link(req: Request, app: &App) -> ResultResp {
    let fields = read_form(req)?;
    let email = fields.get("email").map(String::as_str).unwrap_or("");

    let issued = app
        .db
        .with_conn(|conn| app.magic.request_link(conn, email, now_unix()))?;

    // No mail transport: the link goes to the log.
    info!(email = %issued.email, link = %issued.link, "magic link issued");

    html_response(pages::check_email_page(&issued.email))
}

fn redeem_link(req: Request, app: &App) -> ResultResp {
    let params = parse_query(&req);
    let token = params.get("token").map(String::as_str).unwrap_or("");
    let now = now_unix();

    let session = app.db.with_conn(|conn| {
        let redeemed = app.magic.redeem(conn, token, now)?;
        sessions::create_session(conn, redeemed.user_id, now)
    })?;

    redirect_with_cookie("/", Some(session_cookie(&session)))
}

fn logout(req: Request, app: &App) -> ResultResp {
    if let Some(token) = session_token(&req) {
        app.db
            .with_conn(|conn| sessions::revoke_session(conn, &token, now_unix()))?;
    }
    redirect_with_cookie("/", Some(clear_session_cookie()))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    model_loaded: bool,
}

fn health(app: &App) -> ResultResp {
    json_response(
        200,
        &Health {
            status: "ok",
            model_loaded: app.predictor.is_loaded(),
        },
    )
}

fn location_suggestions(app: &App, user: Option<&CurrentUser>) -> Result<Vec<String>, ServerError> {
    let recent = match user {
        Some(u) => app
            .db
            .with_conn(|conn| predictions::recent_locations(conn, u.id, RECENT_LOCATIONS))?,
        None => Vec::new(),
    };
    Ok(choices::location_suggestions(recent))
}

fn current_user(req: &Request, db: &Database) -> Result<Option<CurrentUser>, ServerError> {
    match session_token(req) {
        Some(token) => db.with_conn(|conn| sessions::load_user_from_session(conn, &token, now_unix())),
        None => Ok(None),
    }
}

fn session_token(req: &Request) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn read_form(req: Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.into_body()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("could not read request body: {e}")))?;
    Ok(forms::parse_urlencoded(&body))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| forms::parse_urlencoded(q.as_bytes()))
        .unwrap_or_default()
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
