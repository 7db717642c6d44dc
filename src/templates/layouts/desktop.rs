use crate::auth::CurrentUser;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
header nav ul { display: flex; gap: 1rem; list-style: none; margin: 0; padding: 0; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem 1.5rem; margin-bottom: 1.5rem; }
.field { display: flex; flex-direction: column; margin-bottom: 0.75rem; }
.field-error { color: #dc2626; font-size: 0.9em; }
.notice { background: #ecfdf5; border: 1px solid #10b981; padding: 0.5rem 1rem; border-radius: 6px; }
.notice.warn { background: #fef2f2; border-color: #dc2626; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 0.4rem; border-bottom: 1px solid #e5e7eb; }
"#;

pub fn desktop_layout(title: &str, user: Option<&CurrentUser>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Rent Predictor" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    h3 { "Rent Predictor" }
                    nav {
                        ul {
                            li { a href="/" { "Predict" } }
                            @if user.is_some() {
                                li { a href="/history" { "History" } }
                            }
                        }
                    }
                    @match user {
                        Some(u) => {
                            form method="post" action="/logout" {
                                span { (u.email) " " }
                                button type="submit" { "Log out" }
                            }
                        }
                        None => a href="/login" { "Log In" },
                    }
                }
                (content)
            }
        }
    }
}
