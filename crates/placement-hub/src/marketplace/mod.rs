//! Internship, application and order boards: the query pipeline, the
//! analytics computed next to it, and the page-level service that talks to
//! the record store.

pub mod analytics;
pub mod domain;
pub mod lifecycle;
pub mod query;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use analytics::views::{
    ApplicationAnalytics, InternshipOverview, OrderSummary, PerformanceBar, QuickFilterCount,
    StatusDistribution,
};
pub use analytics::OrderQuickFilter;
pub use lifecycle::{validate_transition, Lifecycle, TransitionError};
pub use router::{marketplace_router, session_from_headers};
pub use service::{BoardError, Loaded, MarketplaceService, NoticeLevel, Notification};
pub use store::{
    ApplicationDraft, ApplicationScope, InternshipDraft, MessageDraft, RecordStore, RequestError,
};
pub use validation::{FieldIssue, ValidationError};
