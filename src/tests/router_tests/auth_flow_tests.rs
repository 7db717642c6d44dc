use crate::auth::token::hash_token;
use crate::errors::ServerError;
use crate::tests::utils::{body_string, get, header, now_unix, post_form, test_app};
use rusqlite::params;

#[test]
fn login_page_loads_successfully() {
    let (app, _dir) = test_app();

    let resp = get(&app, "/login", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Log In"));
    assert!(body.contains(r#"action="/auth/request-link""#));
}

#[test]
fn request_link_shows_check_email_and_stores_a_link() {
    let (app, _dir) = test_app();

    let resp = post_form(&app, "/auth/request-link", "email=Test%40Example.com", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Check your email"));
    assert!(body.contains("test@example.com"));

    let links: i64 = app
        .db
        .with_conn(|conn| {
            conn.query_row("select count(*) from magic_links", [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap();
    assert_eq!(links, 1);
}

#[test]
fn invalid_email_is_a_bad_request() {
    let (app, _dir) = test_app();
    let resp = post_form(&app, "/auth/request-link", "email=nope", None);
    assert_eq!(resp.status(), 400);
}

#[test]
fn magic_link_signs_in_once_and_logout_revokes() {
    let (app, _dir) = test_app();
    let token = app
        .db
        .with_conn(|conn| app.magic.request_link(conn, "c@d.com", now_unix()))
        .unwrap()
        .token;

    let resp = get(&app, &format!("/auth/magic?token={token}"), None);
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/");

    let cookie = header(&resp, "Set-Cookie");
    assert!(cookie.contains("HttpOnly"));
    let session = cookie
        .split(';')
        .next()
        .and_then(|kv| kv.strip_prefix("session="))
        .unwrap()
        .to_string();

    let stored: i64 = app
        .db
        .with_conn(|conn| {
            conn.query_row(
                "select count(*) from sessions where token_hash = ?",
                params![hash_token(&session).as_slice()],
                |r| r.get(0),
            )
            .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap();
    assert_eq!(stored, 1);

    assert_eq!(get(&app, "/history", Some(&session)).status(), 200);

    // Single use.
    let again = get(&app, &format!("/auth/magic?token={token}"), None);
    assert_eq!(again.status(), 401);

    let out = post_form(&app, "/logout", "", Some(&session));
    assert_eq!(out.status(), 302);
    assert!(header(&out, "Set-Cookie").contains("Max-Age=0"));
    assert_eq!(get(&app, "/history", Some(&session)).status(), 302);
}

#[test]
fn missing_token_is_a_bad_request() {
    let (app, _dir) = test_app();
    assert_eq!(get(&app, "/auth/magic", None).status(), 400);
}
