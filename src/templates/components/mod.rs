use maud::{html, Markup};

pub mod error;
pub mod login_form;

pub use error::html_error_response;
pub use login_form::email_cta_form;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// `<select>` over fixed choices, with an optional "any" entry for filters.
pub fn select(name: &str, choices: &[&str], selected: &str, any_label: Option<&str>) -> Markup {
    html! {
        select name=(name) id=(name) {
            @if let Some(label) = any_label {
                option value="" selected[selected.is_empty()] { (label) }
            }
            @for choice in choices {
                option value=(choice) selected[*choice == selected] { (choice) }
            }
        }
    }
}

/// Annual rent with thousands separators, e.g. "AED 34,677.53".
pub fn format_aed(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("AED {amount}");
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("AED {sign}{grouped}.{:02}", cents % 100)
}
