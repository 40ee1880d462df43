//! Analytics module for formscope
//!
//! The aggregation engine behind form dashboards and reports:
//! - Answer normalization over dirty historical payloads
//! - Per-question statistics (option tallies, rating distributions, text
//!   collections)
//! - Form-wide analytics with optional date filtering
//! - Per-user engagement and dashboard rollups
//! - Bounded-window response trends
//!
//! Every aggregator is synchronous, stateless, and infallible: it consumes a
//! snapshot of already-fetched records and always returns a structurally
//! complete result, even over zero data. Caching of the results lives in
//! [`crate::cache`].

pub mod dashboard;
pub mod engagement;
pub mod form;
pub mod normalize;
pub mod question;
pub mod trend;

pub use dashboard::{aggregate_dashboard, DashboardStats, FormResponseCount};
pub use engagement::{aggregate_user_engagement, form_popularity, EngagementAnalytics};
pub use form::{
    aggregate_form, completion_inputs, CompletionInputs, DateRange, FormAnalytics, TimeAnalytics,
};
pub use normalize::{normalize, NormalizedAnswer};
pub use question::{aggregate_question, QuestionAnalytics};
pub use trend::{aggregate_response_trend, TrendPoint};
