// src/predictor/pipeline.rs
//
// Listing -> feature row -> model -> rent. The step order is the order the
// training job applied its transforms in; changing it changes predictions.

use crate::predictor::artifacts::ArtifactBundle;
use crate::predictor::error::{FeatureValueError, PredictError};
use crate::predictor::listing::{ListingInput, NumericField};
use crate::predictor::schema::Slot;

/// Numeric attributes after the area log transform and furnishing encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Derived {
    log_area: f64,
    beds: f64,
    baths: f64,
    age: f64,
    furnishing: f64,
}

impl Derived {
    fn get(&self, field: NumericField) -> f64 {
        match field {
            NumericField::LogArea => self.log_area,
            NumericField::Beds => self.beds,
            NumericField::Baths => self.baths,
            NumericField::Age => self.age,
            NumericField::Furnishing => self.furnishing,
        }
    }
}

/// `ln(1 + area)`. NaN passes through untouched.
pub fn log_area(area_sqft: f64) -> Result<f64, FeatureValueError> {
    if area_sqft.is_infinite() || area_sqft < 0.0 {
        return Err(FeatureValueError::InvalidArea(area_sqft));
    }
    Ok(area_sqft.ln_1p())
}

/// Builds the model input row, ordered as the bundle's feature columns.
pub fn feature_row(bundle: &ArtifactBundle, listing: &ListingInput) -> Result<Vec<f64>, PredictError> {
    let derived = Derived {
        log_area: log_area(listing.area_sqft)?,
        beds: listing.bedrooms as f64,
        baths: listing.bathrooms as f64,
        age: listing.age_in_days as f64,
        furnishing: bundle.furnish_map.code(&listing.furnishing),
    };

    let layout = bundle.layout()?;

    let categories: Vec<&str> = layout.encoded().iter().map(|f| f.value(listing)).collect();
    let indicators = bundle
        .encoder
        .transform(&bundle.categorical_columns, &categories)?;

    let mut scaled: Vec<f64> = layout.scaled().iter().map(|f| derived.get(*f)).collect();
    bundle.scaler.transform(&mut scaled);

    let row = layout
        .slots()
        .iter()
        .map(|slot| match *slot {
            Slot::Numeric(field) => derived.get(field),
            Slot::Scaled(i) => scaled[i],
            Slot::Indicator(i) => indicators[i],
        })
        .collect();

    Ok(row)
}

/// Predicted annual rent for `listing`.
pub fn predict(bundle: &ArtifactBundle, listing: &ListingInput) -> Result<f64, PredictError> {
    let row = feature_row(bundle, listing)?;
    let log_rent = bundle.model.predict(&row)?;
    Ok(log_rent.exp())
}
