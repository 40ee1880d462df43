//! # formscope-core
//!
//! Core analytics library for formscope - a multi-tenant form builder.
//!
//! This library provides:
//! - Domain types for forms, sections, questions, responses, and answers
//! - The response-analytics aggregation engine (per-question, per-form,
//!   per-user statistics and trends)
//! - A TTL cache layer over aggregation results with explicit invalidation
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The aggregators are pure functions over already-fetched records: the
//! route layer authenticates, authorizes, and loads a snapshot, then hands
//! it here. The only shared mutable state is the cache, which sits behind
//! the [`cache::CacheStore`] seam and is injected where it is used.
//!
//! ## Example
//!
//! ```rust,no_run
//! use formscope_core::analytics::aggregate_form;
//! use formscope_core::cache::{AnalyticsCache, MemoryStore};
//!
//! # fn fetch_form() -> formscope_core::Form { unimplemented!() }
//! # fn fetch_responses() -> Vec<formscope_core::Response> { unimplemented!() }
//! let cache = AnalyticsCache::new(Box::new(MemoryStore::new()));
//!
//! let form = fetch_form();
//! let responses = fetch_responses();
//!
//! let analytics = match cache.get_cached_form_analytics(form.id) {
//!     Some(cached) => cached,
//!     None => {
//!         let fresh = aggregate_form(&form, &responses, None);
//!         cache.cache_form_analytics(form.id, &fresh);
//!         fresh
//!     }
//! };
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{
    aggregate_dashboard, aggregate_form, aggregate_question, aggregate_response_trend,
    aggregate_user_engagement, DashboardStats, EngagementAnalytics, FormAnalytics,
    QuestionAnalytics, TrendPoint,
};
pub use cache::{AnalyticsCache, CacheKind, CacheStore, CacheTtls, MemoryStore, SqliteStore};
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;
