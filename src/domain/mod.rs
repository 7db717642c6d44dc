pub mod choices;
pub mod prediction;

pub use prediction::{HistoryQuery, NewPrediction, Page, PredictionRecord, SortOrder};
