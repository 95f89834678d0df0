//! Summary figures computed over whole, unfiltered collections.

mod quick;
mod summary;
pub mod views;

pub use quick::{quick_filter_counts, OrderQuickFilter};
pub use summary::{
    application_analytics, average, internship_overview, order_summary, percentage,
    relative_bars, status_distribution, student_status_distribution,
};
