// templates/pages/home.rs
use crate::auth::CurrentUser;
use crate::domain::choices::{CITIES, FURNISHING, PROPERTY_TYPES};
use crate::forms::{FieldError, PredictionForm};
use crate::templates::components::select;
use crate::templates::{card, desktop_layout, format_aed};
use maud::{html, Markup};

/// What to show under the form.
#[derive(Clone, Copy)]
pub enum Outcome<'a> {
    Blank,
    Invalid(&'a [FieldError]),
    Predicted(f64),
}

pub fn home_page(
    user: Option<&CurrentUser>,
    form: &PredictionForm,
    locations: &[String],
    outcome: Outcome<'_>,
) -> Markup {
    let errors: &[FieldError] = match outcome {
        Outcome::Invalid(errors) => errors,
        _ => &[],
    };

    desktop_layout(
        "Predict",
        user,
        html! {
            main {
                h1 { "Estimate annual rent" }

                @if let Outcome::Predicted(rent) = outcome {
                    div class="notice" id="result" {
                        p { strong { "Prediction successful!" } }
                        p { "Estimated annual rent: " strong { (format_aed(rent)) } }
                        @if user.is_none() {
                            p { a href="/login" { "Log in" } " to keep a history of your predictions." }
                        }
                    }
                }

                @if !errors.is_empty() {
                    div class="notice warn" { "Please correct the errors below." }
                }

                (card("Listing details", prediction_form(form, locations, errors)))
            }
        },
    )
}

fn prediction_form(form: &PredictionForm, locations: &[String], errors: &[FieldError]) -> Markup {
    html! {
        form method="post" action="/predict" {
            (number_field("area_in_sqft", "Area (sqft)", &form.area_in_sqft, "any", errors))
            (number_field("beds", "Beds", &form.beds, "1", errors))
            (number_field("baths", "Baths", &form.baths, "1", errors))
            (number_field("age_of_listing_in_days", "Age of listing (days)", &form.age_of_listing_in_days, "1", errors))

            div class="field" {
                label for="furnishing" { "Furnishing" }
                (select("furnishing", &FURNISHING, &form.furnishing, None))
                (field_errors("furnishing", errors))
            }
            div class="field" {
                label for="type" { "Property Type" }
                (select("type", &PROPERTY_TYPES, &form.property_type, None))
                (field_errors("type", errors))
            }
            div class="field" {
                label for="location" { "Location" }
                input type="text" id="location" name="location" list="location-options"
                    autocomplete="off" value=(form.location) required;
                datalist id="location-options" {
                    @for loc in locations {
                        option value=(loc) {}
                    }
                }
                (field_errors("location", errors))
            }
            div class="field" {
                label for="city" { "City" }
                (select("city", &CITIES, &form.city, None))
                (field_errors("city", errors))
            }

            button type="submit" { "Predict Rent" }
        }
    }
}

fn number_field(name: &str, label: &str, value: &str, step: &str, errors: &[FieldError]) -> Markup {
    html! {
        div class="field" {
            label for=(name) { (label) }
            input type="number" id=(name) name=(name) value=(value) step=(step) required;
            (field_errors(name, errors))
        }
    }
}

fn field_errors(name: &str, errors: &[FieldError]) -> Markup {
    html! {
        @for e in errors.iter().filter(|e| e.field == name) {
            span class="field-error" { (e.message) }
        }
    }
}
