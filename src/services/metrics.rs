use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, register_gauge, Counter, CounterVec, Gauge};

lazy_static! {
    pub static ref RATINGS_COUNTER: Counter = register_counter!(
        "lunch_ratings_total",
        "Ratings accepted since startup"
    ).unwrap();

    pub static ref MENUS_PUBLISHED_COUNTER: Counter = register_counter!(
        "lunch_menus_published_total",
        "Menus published (including republications) since startup"
    ).unwrap();

    pub static ref REJECTIONS_COUNTER: CounterVec = register_counter_vec!(
        "lunch_rejections_total",
        "Rejected operations by reason",
        &["reason"]
    ).unwrap();

    pub static ref STORE_FALLBACKS_COUNTER: Counter = register_counter!(
        "lunch_store_fallbacks_total",
        "Reads served from an empty table because the store failed"
    ).unwrap();

    pub static ref PUBLISHED_DAYS_GAUGE: Gauge = register_gauge!(
        "lunch_published_days",
        "Distinct days with a published menu"
    ).unwrap();
}

pub fn record_rejection(reason: &str) {
    REJECTIONS_COUNTER.with_label_values(&[reason]).inc();
}
