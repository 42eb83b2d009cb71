use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Inclusive bounds for a rating score.
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 5.0;

/// One row of the lunch table.
///
/// A row with no `user_name` is a menu row for its date; a row with a
/// `user_name` is a rating. Rating rows repeat the meal name that was active
/// when they were submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub date: NaiveDate,
    pub meal_name: Option<String>,
    pub user_name: Option<String>,
    pub score: Option<f64>,
    pub comment: Option<String>,
    /// Time of day of the submission, whole seconds.
    pub timestamp: Option<NaiveTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Menu,
    Rating,
}

impl Entry {
    pub fn menu(date: NaiveDate, meal_name: impl Into<String>, at: NaiveTime) -> Self {
        Self {
            date,
            meal_name: Some(meal_name.into()),
            user_name: None,
            score: None,
            comment: None,
            timestamp: Some(truncate_to_seconds(at)),
        }
    }

    pub fn rating(
        date: NaiveDate,
        meal_name: Option<String>,
        user_name: impl Into<String>,
        score: f64,
        comment: Option<String>,
        at: NaiveTime,
    ) -> Self {
        Self {
            date,
            meal_name,
            user_name: Some(user_name.into()),
            score: Some(score),
            comment,
            timestamp: Some(truncate_to_seconds(at)),
        }
    }

    /// `None` for rows that carry neither a rater nor a meal.
    pub fn kind(&self) -> Option<EntryKind> {
        match (&self.user_name, &self.meal_name) {
            (Some(_), _) => Some(EntryKind::Rating),
            (None, Some(_)) => Some(EntryKind::Menu),
            (None, None) => None,
        }
    }

    pub fn is_menu(&self) -> bool {
        self.kind() == Some(EntryKind::Menu)
    }

    pub fn is_rating(&self) -> bool {
        self.kind() == Some(EntryKind::Rating)
    }

    /// Rows removed when a new menu is published for `date`.
    pub fn is_superseded_by_menu_on(&self, date: NaiveDate) -> bool {
        self.date == date && self.user_name.is_none()
    }
}

pub fn truncate_to_seconds(t: NaiveTime) -> NaiveTime {
    t.with_nanosecond(0).unwrap_or(t)
}

pub fn score_in_range(score: f64) -> bool {
    score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Body for POST /ratings.
#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    pub user_name: String,
    pub score: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Body for PUT /menus. `date` defaults to today.
#[derive(Debug, Deserialize)]
pub struct PublishMenuRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub meal_name: String,
}
