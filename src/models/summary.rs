use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entry::Entry;

/// Everything shown for one day: the meal, its mean score and the ratings
/// in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub meal_name: Option<String>,
    pub average: Option<f64>,
    pub rating_count: usize,
    pub ratings: Vec<Entry>,
}

/// Response for GET /today.
#[derive(Debug, Serialize)]
pub struct TodayView {
    #[serde(flatten)]
    pub summary: DaySummary,
    pub rating_open: bool,
    /// Only filled when no menu is set, so the caller can see which days do have one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub published_dates: Vec<NaiveDate>,
}

/// Response for GET /menus/{date}.
#[derive(Debug, Serialize)]
pub struct MenuView {
    pub date: NaiveDate,
    pub meal_name: Option<String>,
}

