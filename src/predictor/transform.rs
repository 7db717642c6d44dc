// src/predictor/transform.rs
//
// Fitted transforms as exported by the training job. Field names follow the
// attribute names of the fitted objects (`mean_`, `scale_`, `categories_`)
// minus the trailing underscore.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::predictor::error::FeatureValueError;

fn enabled() -> bool {
    true
}

/// Standardizes values as `(x - mean) / scale`, one entry per continuous column.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default = "enabled")]
    pub with_mean: bool,
    #[serde(default = "enabled")]
    pub with_std: bool,
}

impl StandardScaler {
    /// Checks the fitted parameters against the continuous column list.
    pub fn check(&self, columns: &[String]) -> Result<(), String> {
        if self.mean.len() != columns.len() || self.scale.len() != columns.len() {
            return Err(format!(
                "scaler has {} means and {} scales for {} continuous columns",
                self.mean.len(),
                self.scale.len(),
                columns.len()
            ));
        }

        if let Some(names) = &self.feature_names {
            if names.as_slice() != columns {
                return Err(format!(
                    "scaler was fitted on {names:?} but continuous columns are {columns:?}"
                ));
            }
        }

        if let Some(bad) = self
            .mean
            .iter()
            .chain(self.scale.iter())
            .find(|v| !v.is_finite())
        {
            return Err(format!("scaler parameter {bad} is not finite"));
        }

        Ok(())
    }

    /// Scales `value` as column `index`. A zero scale means the column was
    /// constant at fit time and is left unscaled.
    pub fn transform_one(&self, index: usize, value: f64) -> f64 {
        let mut out = value;
        if self.with_mean {
            out -= self.mean[index];
        }
        if self.with_std {
            let scale = self.scale[index];
            if scale != 0.0 {
                out /= scale;
            }
        }
        out
    }

    pub fn transform(&self, values: &mut [f64]) {
        for (i, v) in values.iter_mut().enumerate() {
            *v = self.transform_one(i, *v);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCategory {
    #[default]
    Ignore,
    Error,
}

/// One-hot encoder with a fixed vocabulary per input column.
#[derive(Debug, Clone, Deserialize)]
pub struct OneHotEncoder {
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub handle_unknown: UnknownCategory,
}

impl OneHotEncoder {
    pub fn check(&self, columns: &[String]) -> Result<(), String> {
        if self.categories.len() != columns.len() {
            return Err(format!(
                "encoder has {} category groups for {} categorical columns",
                self.categories.len(),
                columns.len()
            ));
        }
        Ok(())
    }

    /// Total number of indicator columns.
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    /// Output names, `<column>_<category>`, in output order.
    pub fn feature_names(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .zip(&self.categories)
            .flat_map(|(col, cats)| cats.iter().map(move |cat| format!("{col}_{cat}")))
            .collect()
    }

    /// Expands one value per input column into indicator columns.
    pub fn transform(
        &self,
        columns: &[String],
        values: &[&str],
    ) -> Result<Vec<f64>, FeatureValueError> {
        let mut out = vec![0.0; self.width()];
        let mut offset = 0;

        for ((column, cats), value) in columns.iter().zip(&self.categories).zip(values) {
            match cats.iter().position(|c| c == value) {
                Some(i) => out[offset + i] = 1.0,
                None if self.handle_unknown == UnknownCategory::Ignore => {}
                None => {
                    return Err(FeatureValueError::UnknownCategory {
                        column: column.clone(),
                        value: value.to_string(),
                    })
                }
            }
            offset += cats.len();
        }

        Ok(out)
    }
}

/// Furnishing label to numeric code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FurnishMap(pub BTreeMap<String, f64>);

impl FurnishMap {
    /// Unknown labels encode as 0.
    pub fn code(&self, label: &str) -> f64 {
        self.0.get(label).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scaler_standardizes_and_tolerates_zero_scale() {
        let scaler: StandardScaler =
            serde_json::from_str(r#"{"mean": [10.0, 3.0], "scale": [2.0, 0.0]}"#).unwrap();

        let mut values = [14.0, 5.0];
        scaler.transform(&mut values);

        assert_eq!(values, [2.0, 2.0]);
    }

    #[test]
    fn scaler_respects_with_mean_flag() {
        let scaler: StandardScaler = serde_json::from_str(
            r#"{"mean": [10.0], "scale": [2.0], "with_mean": false}"#,
        )
        .unwrap();

        assert_eq!(scaler.transform_one(0, 14.0), 7.0);
    }

    #[test]
    fn scaler_propagates_nan() {
        let scaler: StandardScaler =
            serde_json::from_str(r#"{"mean": [1.0], "scale": [1.0]}"#).unwrap();
        assert!(scaler.transform_one(0, f64::NAN).is_nan());
    }

    #[test]
    fn scaler_check_rejects_mismatched_names() {
        let scaler: StandardScaler = serde_json::from_str(
            r#"{"feature_names": ["Beds"], "mean": [1.0], "scale": [1.0]}"#,
        )
        .unwrap();

        assert!(scaler.check(&cols(&["Beds"])).is_ok());
        assert!(scaler.check(&cols(&["Baths"])).is_err());
        assert!(scaler.check(&cols(&["Beds", "Baths"])).is_err());
    }

    #[test]
    fn encoder_names_follow_column_underscore_category() {
        let enc: OneHotEncoder = serde_json::from_str(
            r#"{"categories": [["Apartment", "Villa"], ["Dubai"]]}"#,
        )
        .unwrap();

        assert_eq!(
            enc.feature_names(&cols(&["Type", "City"])),
            cols(&["Type_Apartment", "Type_Villa", "City_Dubai"])
        );
    }

    #[test]
    fn encoder_ignores_unknown_categories_by_default() {
        let enc: OneHotEncoder = serde_json::from_str(
            r#"{"categories": [["Apartment", "Villa"], ["Dubai", "Sharjah"]]}"#,
        )
        .unwrap();

        let out = enc
            .transform(&cols(&["Type", "City"]), &["Castle", "Sharjah"])
            .unwrap();

        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn encoder_with_error_policy_rejects_unknown_categories() {
        let enc: OneHotEncoder = serde_json::from_str(
            r#"{"categories": [["Apartment"]], "handle_unknown": "error"}"#,
        )
        .unwrap();

        let err = enc.transform(&cols(&["Type"]), &["Castle"]).unwrap_err();
        assert_eq!(
            err,
            FeatureValueError::UnknownCategory {
                column: "Type".into(),
                value: "Castle".into()
            }
        );
    }

    #[test]
    fn furnish_map_defaults_unknown_labels_to_zero() {
        let map: FurnishMap =
            serde_json::from_str(r#"{"Furnished": 1, "Unfurnished": 0}"#).unwrap();

        assert_eq!(map.code("Furnished"), 1.0);
        assert_eq!(map.code("Studio-Flex"), 0.0);
        assert_eq!(map.code("Studio-Flex"), map.code("Unfurnished"));
    }
}
