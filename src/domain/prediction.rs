// src/domain/prediction.rs
use chrono::{DateTime, Utc};

use crate::predictor::ListingInput;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// A stored prediction together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub area: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub furnishing: String,
    pub age_of_listing: i64,
    pub property_type: String,
    pub city: String,
    pub location: String,
    pub predicted_rent: f64,
    pub created_at: i64,
}

impl PredictionRecord {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    pub fn created_label(&self) -> String {
        self.created_at_utc()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Insert payload; the id is assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrediction {
    pub user_id: Option<i64>,
    pub listing: ListingInput,
    pub predicted_rent: f64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    RentHigh,
    RentLow,
    AreaHigh,
    AreaLow,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::RentHigh,
        SortOrder::RentLow,
        SortOrder::AreaHigh,
        SortOrder::AreaLow,
    ];

    /// Unknown keys fall back to newest first.
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.key() == key)
            .unwrap_or_default()
    }

    pub fn key(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::RentHigh => "rent_high",
            SortOrder::RentLow => "rent_low",
            SortOrder::AreaHigh => "area_high",
            SortOrder::AreaLow => "area_low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest first",
            SortOrder::Oldest => "Oldest first",
            SortOrder::RentHigh => "Rent: high to low",
            SortOrder::RentLow => "Rent: low to high",
            SortOrder::AreaHigh => "Area: large to small",
            SortOrder::AreaLow => "Area: small to large",
        }
    }

    /// ORDER BY clause. The id tiebreak keeps paging stable.
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Newest => "created_at desc, id desc",
            SortOrder::Oldest => "created_at asc, id asc",
            SortOrder::RentHigh => "predicted_rent desc, id desc",
            SortOrder::RentLow => "predicted_rent asc, id asc",
            SortOrder::AreaHigh => "area desc, id desc",
            SortOrder::AreaLow => "area asc, id asc",
        }
    }
}

/// History filters, sort, and paging. Empty filters match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub furnishing: Option<String>,
    pub location: Option<String>,
    pub sort: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            city: None,
            property_type: None,
            furnishing: None,
            location: None,
            sort: SortOrder::Newest,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl HistoryQuery {
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.per_page())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn pages(&self) -> u32 {
        if self.total == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.per_page.max(1))) as u32
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }
}
