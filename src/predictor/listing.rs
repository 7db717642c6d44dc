// src/predictor/listing.rs

/// Column names the model was trained with.
pub mod columns {
    pub const AREA: &str = "Area_in_sqft";
    pub const LOG_AREA: &str = "Log_Area";
    pub const BEDS: &str = "Beds";
    pub const BATHS: &str = "Baths";
    pub const AGE: &str = "Age_of_listing_in_days";
    pub const FURNISHING: &str = "Furnishing";
    pub const TYPE: &str = "Type";
    pub const LOCATION: &str = "Location";
    pub const CITY: &str = "City";
}

/// One listing as entered by a user. Range checks belong to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingInput {
    pub area_sqft: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub age_in_days: i64,
    pub furnishing: String,
    pub property_type: String,
    pub location: String,
    pub city: String,
}

/// Numeric columns available once area is log-transformed and furnishing encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    LogArea,
    Beds,
    Baths,
    Age,
    Furnishing,
}

impl NumericField {
    pub const ALL: [NumericField; 5] = [
        NumericField::LogArea,
        NumericField::Beds,
        NumericField::Baths,
        NumericField::Age,
        NumericField::Furnishing,
    ];

    pub fn column(self) -> &'static str {
        match self {
            NumericField::LogArea => columns::LOG_AREA,
            NumericField::Beds => columns::BEDS,
            NumericField::Baths => columns::BATHS,
            NumericField::Age => columns::AGE,
            NumericField::Furnishing => columns::FURNISHING,
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }

    /// Computed from the listing rather than copied from it.
    pub fn is_derived(self) -> bool {
        matches!(self, NumericField::LogArea | NumericField::Furnishing)
    }
}

/// Text columns that may be one-hot encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Type,
    Location,
    City,
}

impl TextField {
    pub const ALL: [TextField; 3] = [TextField::Type, TextField::Location, TextField::City];

    pub fn column(self) -> &'static str {
        match self {
            TextField::Type => columns::TYPE,
            TextField::Location => columns::LOCATION,
            TextField::City => columns::CITY,
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }

    pub fn value(self, listing: &ListingInput) -> &str {
        match self {
            TextField::Type => &listing.property_type,
            TextField::Location => &listing.location,
            TextField::City => &listing.city,
        }
    }
}
