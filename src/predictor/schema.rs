// src/predictor/schema.rs
use std::collections::{BTreeMap, BTreeSet};

use crate::predictor::error::FeatureSchemaError;
use crate::predictor::listing::{NumericField, TextField};
use crate::predictor::transform::OneHotEncoder;

/// Where one model input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Unscaled numeric attribute.
    Numeric(NumericField),
    /// Position in the scaler's output.
    Scaled(usize),
    /// Position in the encoder's output.
    Indicator(usize),
}

/// The column contract of an artifact bundle, resolved once.
///
/// Replays the preprocessing steps over column *names* only: derive the
/// numeric columns, swap each categorical column for its indicator columns,
/// mark the scaled columns, then look up every feature column in what was
/// produced. Anything that would fail at reindex time fails here instead.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    slots: Vec<Slot>,
    encoded: Vec<TextField>,
    scaled: Vec<NumericField>,
}

impl FeatureLayout {
    pub fn compile(
        categorical_columns: &[String],
        continuous_columns: &[String],
        encoder: &OneHotEncoder,
        feature_columns: &[String],
    ) -> Result<Self, FeatureSchemaError> {
        let mut produced: BTreeMap<String, Slot> = NumericField::ALL
            .into_iter()
            .map(|f| (f.column().to_string(), Slot::Numeric(f)))
            .collect();
        let mut text_only: BTreeSet<&str> = TextField::ALL.iter().map(|f| f.column()).collect();

        let mut encoded = Vec::with_capacity(categorical_columns.len());
        for col in categorical_columns {
            let field = TextField::from_column(col)
                .ok_or_else(|| FeatureSchemaError::NotCategorical(col.clone()))?;
            if encoded.contains(&field) {
                return Err(FeatureSchemaError::DuplicateColumn(col.clone()));
            }
            text_only.remove(field.column());
            encoded.push(field);
        }

        for (i, name) in encoder
            .feature_names(categorical_columns)
            .into_iter()
            .enumerate()
        {
            if produced.contains_key(&name) {
                return Err(FeatureSchemaError::DuplicateColumn(name));
            }
            produced.insert(name, Slot::Indicator(i));
        }

        let mut scaled = Vec::with_capacity(continuous_columns.len());
        for (i, col) in continuous_columns.iter().enumerate() {
            let field = NumericField::from_column(col)
                .ok_or_else(|| FeatureSchemaError::NotContinuous(col.clone()))?;
            if scaled.contains(&field) {
                return Err(FeatureSchemaError::DuplicateColumn(col.clone()));
            }
            produced.insert(col.clone(), Slot::Scaled(i));
            scaled.push(field);
        }

        let mut slots = Vec::with_capacity(feature_columns.len());
        for col in feature_columns {
            match produced.remove(col) {
                Some(slot) => slots.push(slot),
                None if text_only.contains(col.as_str()) => {
                    return Err(FeatureSchemaError::NonNumeric(col.clone()))
                }
                None if feature_columns.iter().filter(|c| *c == col).count() > 1 => {
                    return Err(FeatureSchemaError::DuplicateColumn(col.clone()))
                }
                None => return Err(FeatureSchemaError::MissingColumn(col.clone())),
            }
        }

        // Raw counts the model does not use are dropped. Scaled, encoded,
        // and derived columns must all be consumed.
        let extra = produced.into_iter().find(|(_, slot)| match slot {
            Slot::Numeric(field) => field.is_derived(),
            Slot::Scaled(_) | Slot::Indicator(_) => true,
        });
        if let Some((extra, _)) = extra {
            return Err(FeatureSchemaError::UnexpectedColumn(extra));
        }

        Ok(Self {
            slots,
            encoded,
            scaled,
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Text attributes fed to the encoder, in encoder order.
    pub fn encoded(&self) -> &[TextField] {
        &self.encoded
    }

    /// Numeric attributes fed to the scaler, in scaler order.
    pub fn scaled(&self) -> &[NumericField] {
        &self.scaled
    }

}
