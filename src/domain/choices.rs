// src/domain/choices.rs
//
// Values the prediction form offers. The model was trained on these labels.

pub const FURNISHING: [&str; 2] = ["Furnished", "Unfurnished"];

pub const PROPERTY_TYPES: [&str; 9] = [
    "Apartment",
    "Hotel Apartment",
    "Penthouse",
    "Residential Building",
    "Residential Floor",
    "Residential Plot",
    "Townhouse",
    "Villa",
    "Villa Compound",
];

pub const CITIES: [&str; 8] = [
    "Dubai",
    "Abu Dhabi",
    "Sharjah",
    "Ajman",
    "Al Ain",
    "Ras Al Khaimah",
    "Umm Al Quwain",
    "Fujairah",
];

/// Offered as type-ahead suggestions; any location is accepted.
pub const COMMON_LOCATIONS: [&str; 16] = [
    "Al Barsha",
    "Al Nahda",
    "Al Reem Island",
    "Business Bay",
    "Downtown Dubai",
    "Dubai Marina",
    "Dubai Silicon Oasis",
    "Jumeirah Lake Towers",
    "Jumeirah Village Circle",
    "Khalifa City",
    "Mohammed Bin Zayed City",
    "Muwaileh",
    "Palm Jumeirah",
    "Saadiyat Island",
    "Sharjah City Center",
    "Yas Island",
];

pub fn is_choice(choices: &[&str], value: &str) -> bool {
    choices.contains(&value)
}

/// The user's own locations first, then the common ones, without repeats.
pub fn location_suggestions(recent: Vec<String>) -> Vec<String> {
    let mut out = recent;
    for loc in COMMON_LOCATIONS {
        if !out.iter().any(|r| r.eq_ignore_ascii_case(loc)) {
            out.push(loc.to_string());
        }
    }
    out
}
