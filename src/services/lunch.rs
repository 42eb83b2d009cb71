use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
    db::{RecordStore, StoreError},
    error::LunchError,
    models::{
        entry::{score_in_range, Entry, MAX_SCORE, MIN_SCORE},
        summary::DaySummary,
    },
    services::{
        auth::Authenticator,
        metrics::{self, MENUS_PUBLISHED_COUNTER, RATINGS_COUNTER, STORE_FALLBACKS_COUNTER},
    },
};

/// Daily menu publication and rating collection on top of a [`RecordStore`].
///
/// Read-modify-write cycles are serialised inside this process. Writers in
/// other processes sharing the same store are not coordinated.
pub struct LunchBoard {
    store: Arc<dyn RecordStore>,
    auth: Arc<dyn Authenticator>,
    write_lock: Mutex<()>,
}

impl LunchBoard {
    pub fn new(store: Arc<dyn RecordStore>, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            store,
            auth,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// The local calendar day.
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn now() -> NaiveTime {
        Local::now().time()
    }

    /// Reads the store without falling back, for health checks.
    pub async fn check_store(&self) -> Result<usize, StoreError> {
        self.store.read_all().await.map(|rows| rows.len())
    }

    /// Current table, or an empty one when the store cannot be read.
    async fn snapshot(&self) -> Vec<Entry> {
        match self.store.read_all().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Record store read failed, serving empty table: {}", e);
                STORE_FALLBACKS_COUNTER.inc();
                Vec::new()
            }
        }
    }

    pub async fn menu_for(&self, date: NaiveDate) -> Option<String> {
        menu_in(&self.snapshot().await, date)
    }

    /// Sets the meal for `date`, replacing any menu already set for that day.
    pub async fn publish_menu(
        &self,
        date: NaiveDate,
        meal_name: &str,
        credential: &str,
    ) -> Result<Entry, LunchError> {
        if !self.auth.authorize(credential) {
            warn!("Rejected menu publication for {}: bad admin credential", date);
            metrics::record_rejection("unauthorized");
            return Err(LunchError::Unauthorized);
        }

        let meal_name = meal_name.trim();
        if meal_name.is_empty() {
            metrics::record_rejection("invalid_input");
            return Err(LunchError::InvalidInput("Meal name must not be empty".into()));
        }

        let menu = Entry::menu(date, meal_name, Self::now());

        let _guard = self.write_lock.lock().await;
        self.store.replace_menu(menu.clone()).await.map_err(|e| {
            error!("Failed to publish menu for {}: {}", date, e);
            LunchError::from(e)
        })?;

        MENUS_PUBLISHED_COUNTER.inc();
        info!("Published menu for {}: {}", date, meal_name);
        Ok(menu)
    }

    /// Records one rating for `date`. Repeat submissions by the same person
    /// are kept as separate ratings.
    pub async fn submit_rating(
        &self,
        date: NaiveDate,
        user_name: &str,
        score: f64,
        comment: Option<&str>,
    ) -> Result<Entry, LunchError> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            metrics::record_rejection("invalid_input");
            return Err(LunchError::InvalidInput("Name must not be empty".into()));
        }
        if !score_in_range(score) {
            metrics::record_rejection("invalid_input");
            return Err(LunchError::InvalidInput(format!(
                "Score must be between {} and {}",
                MIN_SCORE, MAX_SCORE
            )));
        }
        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);

        let _guard = self.write_lock.lock().await;

        // A failed read here must not turn into an overwrite with an empty table.
        let rows = self.store.read_all().await?;
        let meal_name = match menu_in(&rows, date) {
            Some(meal) => meal,
            None => {
                metrics::record_rejection("no_menu_published");
                return Err(LunchError::NoMenuPublished(date));
            }
        };

        let rating = Entry::rating(date, Some(meal_name), user_name, score, comment, Self::now());
        self.store.append(rating.clone()).await.map_err(|e| {
            error!("Failed to store rating for {}: {}", date, e);
            LunchError::from(e)
        })?;

        RATINGS_COUNTER.inc();
        info!("Rating {} from {} recorded for {}", score, user_name, date);
        Ok(rating)
    }

    pub async fn average_for(&self, date: NaiveDate) -> Option<f64> {
        average_of(&ratings_in(&self.snapshot().await, date))
    }

    pub async fn published_dates(&self) -> BTreeSet<NaiveDate> {
        published_in(&self.snapshot().await)
    }

    /// Published dates, newest first.
    pub async fn history(&self) -> Vec<NaiveDate> {
        self.published_dates().await.into_iter().rev().collect()
    }

    pub async fn ratings_for(&self, date: NaiveDate) -> Vec<Entry> {
        ratings_in(&self.snapshot().await, date)
    }

    /// Meal, mean score and ratings for one day, all from the same read.
    pub async fn day_summary(&self, date: NaiveDate) -> DaySummary {
        let rows = self.snapshot().await;
        let ratings = ratings_in(&rows, date);
        DaySummary {
            date,
            meal_name: menu_in(&rows, date),
            average: average_of(&ratings),
            rating_count: ratings.len(),
            ratings,
        }
    }
}

/// Meal name of the first row of the day that carries one, in insertion order.
/// Rating rows count too, since they repeat the meal that was active.
pub fn menu_in(rows: &[Entry], date: NaiveDate) -> Option<String> {
    rows.iter()
        .filter(|row| row.date == date)
        .find_map(|row| row.meal_name.clone())
}

pub fn ratings_in(rows: &[Entry], date: NaiveDate) -> Vec<Entry> {
    rows.iter()
        .filter(|row| row.date == date && row.is_rating())
        .cloned()
        .collect()
}

pub fn published_in(rows: &[Entry]) -> BTreeSet<NaiveDate> {
    rows.iter()
        .filter(|row| row.is_menu())
        .map(|row| row.date)
        .collect()
}

pub fn average_of(ratings: &[Entry]) -> Option<f64> {
    let scores: Vec<f64> = ratings.iter().filter_map(|r| r.score).collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::db::MemoryRecordStore;
    use crate::services::auth::SharedSecretAuthenticator;

    const KEY: &str = "admin123";

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn board_with(store: Arc<dyn RecordStore>) -> LunchBoard {
        LunchBoard::new(store, Arc::new(SharedSecretAuthenticator::new(KEY)))
    }

    fn board() -> (LunchBoard, Arc<MemoryRecordStore>) {
        let store = Arc::new(MemoryRecordStore::new());
        (board_with(store.clone()), store)
    }

    /// Store whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn read_all(&self) -> Result<Vec<Entry>, StoreError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        async fn replace_all(&self, _entries: Vec<Entry>) -> Result<(), StoreError> {
            Err(std::io::Error::other("disk on fire").into())
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    /// Reads fine, refuses to write.
    struct ReadOnlyStore(MemoryRecordStore);

    #[async_trait]
    impl RecordStore for ReadOnlyStore {
        async fn read_all(&self) -> Result<Vec<Entry>, StoreError> {
            self.0.read_all().await
        }

        async fn replace_all(&self, _entries: Vec<Entry>) -> Result<(), StoreError> {
            Err(std::io::Error::other("read-only").into())
        }

        fn backend_name(&self) -> &'static str {
            "read-only"
        }
    }

    #[tokio::test]
    async fn lunch_day_scenario() {
        let (board, _) = board();
        board.publish_menu(d(1), "Chicken Rice", KEY).await.unwrap();
        board.submit_rating(d(1), "Alice", 4.5, Some("good")).await.unwrap();
        board.submit_rating(d(1), "Bob", 3.0, Some("")).await.unwrap();

        assert_eq!(board.average_for(d(1)).await, Some(3.75));

        let ratings = board.ratings_for(d(1)).await;
        let names: Vec<_> = ratings.iter().filter_map(|r| r.user_name.as_deref()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(ratings[0].comment.as_deref(), Some("good"));
        assert_eq!(ratings[1].comment, None);
        assert_eq!(ratings[0].meal_name.as_deref(), Some("Chicken Rice"));
    }

    #[tokio::test]
    async fn no_menu_means_no_rating() {
        let (board, store) = board();
        assert_eq!(board.menu_for(d(1)).await, None);

        let err = board.submit_rating(d(1), "Alice", 4.0, None).await.unwrap_err();
        assert!(matches!(err, LunchError::NoMenuPublished(day) if day == d(1)));
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn menu_on_another_day_does_not_open_rating() {
        let (board, _) = board();
        board.publish_menu(d(2), "Curry", KEY).await.unwrap();
        let err = board.submit_rating(d(1), "Alice", 4.0, None).await.unwrap_err();
        assert!(matches!(err, LunchError::NoMenuPublished(_)));
    }

    #[tokio::test]
    async fn valid_rating_adds_exactly_one_row() {
        let (board, store) = board();
        board.publish_menu(d(1), "Soup", KEY).await.unwrap();
        let before = store.read_all().await.unwrap().len();

        let entry = board.submit_rating(d(1), "  Carol ", 0.0, None).await.unwrap();

        assert_eq!(store.read_all().await.unwrap().len(), before + 1);
        assert_eq!(entry.user_name.as_deref(), Some("Carol"));
        assert_eq!(entry.score, Some(0.0));
        assert!(entry.timestamp.is_some());
    }

    #[tokio::test]
    async fn invalid_ratings_are_rejected() {
        let (board, store) = board();
        board.publish_menu(d(1), "Soup", KEY).await.unwrap();

        for (name, score) in [("", 3.0), ("   ", 3.0), ("Dan", -0.5), ("Dan", 5.5), ("Dan", f64::NAN)] {
            let err = board.submit_rating(d(1), name, score, None).await.unwrap_err();
            assert!(matches!(err, LunchError::InvalidInput(_)), "{name:?} {score}");
        }
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_ratings_are_kept() {
        let (board, _) = board();
        board.publish_menu(d(1), "Soup", KEY).await.unwrap();
        board.submit_rating(d(1), "Alice", 1.0, None).await.unwrap();
        board.submit_rating(d(1), "Alice", 5.0, None).await.unwrap();

        assert_eq!(board.ratings_for(d(1)).await.len(), 2);
        assert_eq!(board.average_for(d(1)).await, Some(3.0));
    }

    #[tokio::test]
    async fn average_is_absent_without_ratings() {
        let (board, _) = board();
        assert_eq!(board.average_for(d(1)).await, None);
        board.publish_menu(d(1), "Soup", KEY).await.unwrap();
        assert_eq!(board.average_for(d(1)).await, None);
    }

    #[tokio::test]
    async fn republishing_supersedes_and_keeps_ratings() {
        let (board, store) = board();
        board.publish_menu(d(1), "Chicken Rice", KEY).await.unwrap();
        board.submit_rating(d(1), "Alice", 4.5, None).await.unwrap();
        board.publish_menu(d(1), "Fish Noodles", KEY).await.unwrap();

        let rows = store.read_all().await.unwrap();
        let menus: Vec<_> = rows.iter().filter(|r| r.date == d(1) && r.is_menu()).collect();
        assert_eq!(menus.len(), 1);
        assert_eq!(menus[0].meal_name.as_deref(), Some("Fish Noodles"));
        // Alice's rating comes first and still names the earlier meal.
        assert_eq!(board.menu_for(d(1)).await.as_deref(), Some("Chicken Rice"));

        let ratings = board.ratings_for(d(1)).await;
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].meal_name.as_deref(), Some("Chicken Rice"));
    }

    #[tokio::test]
    async fn publishing_requires_the_admin_credential() {
        let (board, store) = board();
        let err = board.publish_menu(d(1), "Soup", "letmein").await.unwrap_err();
        assert!(matches!(err, LunchError::Unauthorized));
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn publishing_rejects_blank_meal() {
        let (board, _) = board();
        let err = board.publish_menu(d(1), "  ", KEY).await.unwrap_err();
        assert!(matches!(err, LunchError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn first_named_row_wins_in_insertion_order() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let store = Arc::new(MemoryRecordStore::with_rows(vec![
            Entry::rating(d(1), Some("Stale".into()), "Eve", 2.0, None, t),
            Entry::menu(d(1), "First", t),
            Entry::menu(d(1), "Second", t),
        ]));
        let board = board_with(store);
        assert_eq!(board.menu_for(d(1)).await.as_deref(), Some("Stale"));
    }

    #[tokio::test]
    async fn republishing_before_any_rating_changes_the_menu() {
        let (board, _) = board();
        board.publish_menu(d(1), "Chicken Rice", KEY).await.unwrap();
        board.publish_menu(d(1), "Fish Noodles", KEY).await.unwrap();
        assert_eq!(board.menu_for(d(1)).await.as_deref(), Some("Fish Noodles"));

        let rating = board.submit_rating(d(1), "Alice", 4.0, None).await.unwrap();
        assert_eq!(rating.meal_name.as_deref(), Some("Fish Noodles"));
    }

    #[tokio::test]
    async fn duplicate_menu_rows_resolve_to_the_first() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let store = Arc::new(MemoryRecordStore::with_rows(vec![
            Entry::menu(d(1), "First", t),
            Entry::menu(d(1), "Second", t),
        ]));
        let board = board_with(store);
        assert_eq!(board.menu_for(d(1)).await.as_deref(), Some("First"));
    }

    #[tokio::test]
    async fn rating_rows_alone_do_not_publish_a_date() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let store = Arc::new(MemoryRecordStore::with_rows(vec![
            Entry::rating(d(3), Some("Orphan".into()), "Eve", 2.0, None, t),
            Entry::menu(d(1), "Soup", t),
            Entry::menu(d(2), "Rice", t),
        ]));
        let board = board_with(store);

        let dates = board.published_dates().await;
        assert_eq!(dates.into_iter().collect::<Vec<_>>(), vec![d(1), d(2)]);
        assert_eq!(board.history().await, vec![d(2), d(1)]);
    }

    #[tokio::test]
    async fn day_summary_collects_everything() {
        let (board, _) = board();
        board.publish_menu(d(1), "Chicken Rice", KEY).await.unwrap();
        board.submit_rating(d(1), "Alice", 4.5, Some("good")).await.unwrap();
        board.submit_rating(d(1), "Bob", 3.0, None).await.unwrap();

        let summary = board.day_summary(d(1)).await;
        assert_eq!(summary.meal_name.as_deref(), Some("Chicken Rice"));
        assert_eq!(summary.average, Some(3.75));
        assert_eq!(summary.rating_count, 2);

        let empty = board.day_summary(d(9)).await;
        assert_eq!(empty.meal_name, None);
        assert_eq!(empty.average, None);
        assert!(empty.ratings.is_empty());
    }

    #[tokio::test]
    async fn reads_fall_back_to_empty_table() {
        let board = board_with(Arc::new(BrokenStore));
        assert_eq!(board.menu_for(d(1)).await, None);
        assert!(board.published_dates().await.is_empty());
        assert!(board.check_store().await.is_err());
    }

    #[tokio::test]
    async fn writes_surface_store_failures() {
        let board = board_with(Arc::new(BrokenStore));
        let err = board.submit_rating(d(1), "Alice", 4.0, None).await.unwrap_err();
        assert!(matches!(err, LunchError::StoreUnavailable(_)));

        let err = board.publish_menu(d(1), "Soup", KEY).await.unwrap_err();
        assert!(matches!(err, LunchError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn failed_append_leaves_table_untouched() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let inner = MemoryRecordStore::with_rows(vec![Entry::menu(d(1), "Soup", t)]);
        let board = board_with(Arc::new(ReadOnlyStore(inner)));

        let err = board.submit_rating(d(1), "Alice", 4.0, None).await.unwrap_err();
        assert!(matches!(err, LunchError::StoreUnavailable(_)));
        assert!(board.ratings_for(d(1)).await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_submissions_all_land() {
        let (board, _) = board();
        let board = Arc::new(board);
        board.publish_menu(d(1), "Soup", KEY).await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let board = board.clone();
                tokio::spawn(async move {
                    board
                        .submit_rating(d(1), &format!("user{i}"), 5.0, None)
                        .await
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert_eq!(board.ratings_for(d(1)).await.len(), 10);
    }
}
