use crate::predictor::testing::SAMPLE_RENT;
use crate::tests::utils::{
    body_string, broken_model_app, count_predictions, get, login, post_form, test_app, VALID_FORM,
};
use crate::db::predictions::list_predictions;
use crate::domain::HistoryQuery;
use approx::assert_relative_eq;

#[test]
fn home_page_shows_the_form() {
    let (app, _dir) = test_app();

    let resp = get(&app, "/", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains(r#"action="/predict""#));
    assert!(body.contains("Villa Compound"));
    assert!(body.contains("Umm Al Quwain"));
}

#[test]
fn anonymous_prediction_is_stored_without_a_user() {
    let (app, _dir) = test_app();

    let resp = post_form(&app, "/predict", VALID_FORM, None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Prediction successful!"));
    assert!(body.contains("AED 34,677.53"));

    let user_id: Option<i64> = app
        .db
        .with_conn(|conn| {
            conn.query_row("select user_id from predictions", [], |r| r.get(0))
                .map_err(|e| crate::errors::ServerError::DbError(e.to_string()))
        })
        .unwrap();
    assert_eq!(user_id, None);
}

#[test]
fn logged_in_prediction_is_attributed() {
    let (app, _dir) = test_app();
    let (user_id, session) = login(&app, "owner@example.com");

    let resp = post_form(&app, "/predict", VALID_FORM, Some(&session));
    assert_eq!(resp.status(), 200);

    let page = app
        .db
        .with_conn(|conn| list_predictions(conn, user_id, &HistoryQuery::default()))
        .unwrap();
    assert_eq!(page.total, 1);
    let rec = &page.items[0];
    assert_relative_eq!(rec.predicted_rent, SAMPLE_RENT, max_relative = 1e-12);
    assert_eq!(rec.location, "Dubai Marina");
    assert_eq!(rec.area, 850.0);
}

#[test]
fn invalid_form_rerenders_and_stores_nothing() {
    let (app, _dir) = test_app();
    let form = VALID_FORM.replace("area_in_sqft=850", "area_in_sqft=-100");

    let resp = post_form(&app, "/predict", &form, None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Area must be at least 100 sqft."));
    assert!(body.contains(r#"value="Dubai Marina""#));
    assert!(!body.contains("Prediction successful!"));
    assert_eq!(count_predictions(&app), 0);
}

#[test]
fn unknown_city_is_rejected_by_the_form() {
    let (app, _dir) = test_app();
    let form = VALID_FORM.replace("city=Dubai", "city=Paris");

    let body = body_string(post_form(&app, "/predict", &form, None));
    assert!(body.contains("Not a valid choice."));
    assert_eq!(count_predictions(&app), 0);
}

#[test]
fn model_failure_is_a_500_and_stores_nothing() {
    let (app, _dir) = broken_model_app();

    let resp = post_form(&app, "/predict", VALID_FORM, None);
    assert_eq!(resp.status(), 500);
    assert!(body_string(resp).contains("Prediction failed"));
    assert_eq!(count_predictions(&app), 0);
}

#[test]
fn unknown_route_is_404() {
    let (app, _dir) = test_app();
    assert_eq!(get(&app, "/nope", None).status(), 404);
}

#[test]
fn location_field_suggests_past_locations_first() {
    let (app, _dir) = test_app();
    let (_, session) = login(&app, "owner@example.com");
    let form = VALID_FORM.replace("Dubai+Marina", "Al+Qusais");
    post_form(&app, "/predict", &form, Some(&session));

    let body = body_string(get(&app, "/", Some(&session)));
    assert!(body.contains(r#"list="location-options""#));
    let past = body.find(r#"<option value="Al Qusais">"#).unwrap();
    let common = body.find(r#"<option value="Yas Island">"#).unwrap();
    assert!(past < common);

    let anonymous = body_string(get(&app, "/", None));
    assert!(!anonymous.contains("Al Qusais"));
    assert!(anonymous.contains(r#"<option value="Dubai Marina">"#));
}
