mod auth_flow_tests;
mod health_tests;
mod history_tests;
mod predict_tests;
