use crate::tests::utils::{body_string, broken_model_app, get, header, post_form, test_app, VALID_FORM};

#[test]
fn health_reports_model_state() {
    let (app, _dir) = test_app();

    let resp = get(&app, "/health", None);
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), "application/json");
    let before: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(before["model_loaded"], false);

    post_form(&app, "/predict", VALID_FORM, None);

    let after: serde_json::Value =
        serde_json::from_str(&body_string(get(&app, "/health", None))).unwrap();
    assert_eq!(after["status"], "ok");
    assert_eq!(after["model_loaded"], true);
}

#[test]
fn failed_load_keeps_health_unloaded() {
    let (app, _dir) = broken_model_app();
    post_form(&app, "/predict", VALID_FORM, None);

    let health: serde_json::Value =
        serde_json::from_str(&body_string(get(&app, "/health", None))).unwrap();
    assert_eq!(health["model_loaded"], false);
}
