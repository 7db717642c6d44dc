use crate::db::predictions::insert_prediction;
use crate::domain::NewPrediction;
use crate::predictor::ListingInput;
use crate::router::App;
use crate::tests::utils::{body_string, count_predictions, get, header, login, post_form, test_app};

fn store(app: &App, user_id: i64, location: &str, city: &str, rent: f64, at: i64) -> i64 {
    let record = NewPrediction {
        user_id: Some(user_id),
        listing: ListingInput {
            area_sqft: 800.0,
            bedrooms: 2,
            bathrooms: 2,
            age_in_days: 5,
            furnishing: "Furnished".into(),
            property_type: "Apartment".into(),
            location: location.into(),
            city: city.into(),
        },
        predicted_rent: rent,
        created_at: at,
    };
    app.db
        .with_conn(|conn| insert_prediction(conn, &record))
        .unwrap()
}

#[test]
fn history_requires_login() {
    let (app, _dir) = test_app();

    let resp = get(&app, "/history", None);
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/login");

    let resp = get(&app, "/history", Some("not-a-real-session"));
    assert_eq!(resp.status(), 302);

    let login_page = body_string(get(&app, "/login", None));
    assert!(login_page.contains("Log In"));
}

#[test]
fn history_shows_only_current_user_predictions() {
    let (app, _dir) = test_app();
    let (u1, s1) = login(&app, "u1@example.com");
    let (u2, _) = login(&app, "u2@example.com");
    store(&app, u1, "Dubai Marina", "Dubai", 100_000.0, 10);
    store(&app, u2, "Yas Island", "Abu Dhabi", 150_000.0, 20);

    let resp = get(&app, "/history", Some(&s1));
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Dubai Marina"));
    assert!(!body.contains("Yas Island"));
    assert!(body.contains("u1@example.com"));
}

#[test]
fn history_filters_and_pages() {
    let (app, _dir) = test_app();
    let (user, session) = login(&app, "pager@example.com");
    for i in 0..12 {
        store(&app, user, &format!("Tower {i:02}"), "Dubai", 1000.0 + i as f64, i);
    }
    store(&app, user, "Al Majaz", "Sharjah", 500.0, 100);

    let body = body_string(get(&app, "/history?city=Sharjah", Some(&session)));
    assert!(body.contains("Al Majaz"));
    assert!(!body.contains("Tower"));

    let body = body_string(get(&app, "/history?city=Dubai&sort=oldest&page=2", Some(&session)));
    assert!(body.contains("Tower 10"));
    assert!(body.contains("Tower 11"));
    assert!(!body.contains("Tower 09"));
    assert!(body.contains("Page 2 of 2"));
}

#[test]
fn owner_can_delete_own_prediction() {
    let (app, _dir) = test_app();
    let (user, session) = login(&app, "del@example.com");
    let id = store(&app, user, "JLT", "Dubai", 90_000.0, 1);

    let resp = post_form(&app, "/remove", &format!("id={id}&source=history"), Some(&session));
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/history?notice=deleted");
    assert_eq!(count_predictions(&app), 0);

    let body = body_string(get(&app, "/history?notice=deleted", Some(&session)));
    assert!(body.contains("Prediction deleted successfully."));
}

#[test]
fn deleting_someone_elses_prediction_is_refused() {
    let (app, _dir) = test_app();
    let (u1, s1) = login(&app, "u1@example.com");
    let (u2, _) = login(&app, "u2@example.com");
    store(&app, u1, "Dubai Marina", "Dubai", 90_000.0, 1);
    let theirs = store(&app, u2, "Saadiyat", "Abu Dhabi", 140_000.0, 2);

    let resp = post_form(&app, "/remove", &format!("id={theirs}&source=history"), Some(&s1));
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/history?notice=not_found");
    assert_eq!(count_predictions(&app), 2);

    let body = body_string(get(&app, "/history?notice=not_found", Some(&s1)));
    assert!(body.contains("Prediction not found or does not belong to you."));
}

#[test]
fn remove_requires_login_and_a_numeric_id() {
    let (app, _dir) = test_app();
    let resp = post_form(&app, "/remove", "id=1", None);
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/login");

    let (_, session) = login(&app, "x@example.com");
    let resp = post_form(&app, "/remove", "id=abc", Some(&session));
    assert_eq!(resp.status(), 400);
}

#[test]
fn export_downloads_a_workbook() {
    let (app, _dir) = test_app();
    let (user, session) = login(&app, "xl@example.com");
    store(&app, user, "Business Bay", "Dubai", 120_000.0, 1);

    let resp = get(&app, "/history/export?city=Dubai", Some(&session));
    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").contains("spreadsheetml"));
    assert!(header(&resp, "Content-Disposition").contains("predictions.xlsx"));

    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut resp.into_body().reader(), &mut bytes).unwrap();
    assert!(bytes.starts_with(b"PK"));

    assert_eq!(get(&app, "/history/export", None).status(), 302);
}
