// src/forms.rs
use std::collections::HashMap;

use crate::domain::choices::{is_choice, CITIES, FURNISHING, PROPERTY_TYPES};
use crate::domain::{HistoryQuery, SortOrder};
use crate::predictor::ListingInput;

pub const MIN_AREA_SQFT: f64 = 100.0;

/// Decodes an `application/x-www-form-urlencoded` body or query string.
/// Later duplicates win.
pub fn parse_urlencoded(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

/// Raw prediction form values, kept as typed so the form can be re-rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionForm {
    pub area_in_sqft: String,
    pub beds: String,
    pub baths: String,
    pub age_of_listing_in_days: String,
    pub furnishing: String,
    pub property_type: String,
    pub location: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl PredictionForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |k: &str| fields.get(k).map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            area_in_sqft: get("area_in_sqft"),
            beds: get("beds"),
            baths: get("baths"),
            age_of_listing_in_days: get("age_of_listing_in_days"),
            furnishing: get("furnishing"),
            property_type: get("type"),
            location: get("location"),
            city: get("city"),
        }
    }

    /// Checks every field and collects all failures.
    pub fn validate(&self) -> Result<ListingInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let area = match self.area_in_sqft.parse::<f64>() {
            Ok(a) if a.is_finite() && a >= MIN_AREA_SQFT => Some(a),
            Ok(_) => {
                errors.push(FieldError {
                    field: "area_in_sqft",
                    message: format!("Area must be at least {MIN_AREA_SQFT} sqft."),
                });
                None
            }
            Err(_) => {
                errors.push(required_number("area_in_sqft", "Area"));
                None
            }
        };

        let beds = count(&self.beds, "beds", "Beds", &mut errors);
        let baths = count(&self.baths, "baths", "Baths", &mut errors);
        let age = count(
            &self.age_of_listing_in_days,
            "age_of_listing_in_days",
            "Age of listing",
            &mut errors,
        );

        if !is_choice(&FURNISHING, &self.furnishing) {
            errors.push(not_a_choice("furnishing"));
        }
        if !is_choice(&PROPERTY_TYPES, &self.property_type) {
            errors.push(not_a_choice("type"));
        }
        if !is_choice(&CITIES, &self.city) {
            errors.push(not_a_choice("city"));
        }
        if self.location.is_empty() {
            errors.push(FieldError {
                field: "location",
                message: "Location is required.".into(),
            });
        }

        match (area, beds, baths, age) {
            (Some(area_sqft), Some(bedrooms), Some(bathrooms), Some(age_in_days))
                if errors.is_empty() =>
            {
                Ok(ListingInput {
                    area_sqft,
                    bedrooms,
                    bathrooms,
                    age_in_days,
                    furnishing: self.furnishing.clone(),
                    property_type: self.property_type.clone(),
                    location: self.location.clone(),
                    city: self.city.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

fn count(raw: &str, field: &'static str, label: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Some(n),
        Ok(_) => {
            errors.push(FieldError {
                field,
                message: format!("{label} cannot be negative."),
            });
            None
        }
        Err(_) => {
            errors.push(required_number(field, label));
            None
        }
    }
}

fn required_number(field: &'static str, label: &str) -> FieldError {
    FieldError {
        field,
        message: format!("{label} must be a number."),
    }
}

fn not_a_choice(field: &'static str) -> FieldError {
    FieldError {
        field,
        message: "Not a valid choice.".into(),
    }
}

/// History filters from the query string. Blank values mean "any".
pub fn history_query(fields: &HashMap<String, String>) -> HistoryQuery {
    let text = |k: &str| {
        fields
            .get(k)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let number = |k: &str, default: u32| {
        fields
            .get(k)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(default)
    };

    let defaults = HistoryQuery::default();
    HistoryQuery {
        city: text("city"),
        property_type: text("type"),
        furnishing: text("furnishing"),
        location: text("location"),
        sort: fields
            .get("sort")
            .map(|s| SortOrder::from_key(s.trim()))
            .unwrap_or_default(),
        page: number("page", defaults.page),
        per_page: number("per_page", defaults.per_page),
    }
}
