//! Analytics cache layer
//!
//! Aggregation results are cheap to serve and expensive enough to compute
//! that the route layer caches them between mutations. This module owns the
//! key scheme, the TTL policy, and the invalidation protocol; the byte
//! storage itself sits behind the [`CacheStore`] trait in [`store`].
//!
//! The cache is strictly best-effort. A store failure, a missing entry, an
//! expired entry, and an undeserializable payload all look the same to the
//! caller: a miss. Writes and invalidations swallow store errors after
//! logging them. Analytics must keep computing correctly (just slower) when
//! the cache backend is down.
//!
//! Every mutation path that touches a form's responses, answers, or
//! question structure must call [`AnalyticsCache::invalidate_all_for_form`]
//! (or the user-level composite) or stale analytics will be served for up
//! to a full TTL window.

pub mod store;

pub use store::{CacheStore, MemoryStore, SqliteStore};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::analytics::{DashboardStats, EngagementAnalytics, FormAnalytics};

/// Fixed resource id for a user's dashboard-stats entry.
const DASHBOARD_RESOURCE_ID: &str = "all";
/// Fixed resource id for a user's engagement entry.
const ENGAGEMENT_RESOURCE_ID: &str = "metrics";

// ============================================
// Keys
// ============================================

/// The kinds of aggregation results the cache holds.
///
/// Keys are namespaced by kind because form ids and user ids are separate
/// sequences and may collide numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// A form's [`FormAnalytics`] payload
    FormAnalytics,
    /// A user's [`DashboardStats`] payload
    DashboardStats,
    /// A user's [`EngagementAnalytics`] payload
    UserEngagement,
    /// A caller-defined snapshot of a form's raw responses
    FormResponses,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::FormAnalytics => "form_analytics",
            CacheKind::DashboardStats => "dashboard_stats",
            CacheKind::UserEngagement => "user_engagement",
            CacheKind::FormResponses => "form_responses",
        }
    }
}

impl std::fmt::Display for CacheKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the store key for a kind/resource/user triple.
fn cache_key(kind: CacheKind, resource_id: &str, user_id: Option<i64>) -> String {
    match user_id {
        Some(user_id) => format!("{}:{}:user:{}", kind.as_str(), resource_id, user_id),
        None => format!("{}:{}", kind.as_str(), resource_id),
    }
}

// ============================================
// TTL policy
// ============================================

/// Per-kind time-to-live policy.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    /// Form analytics entries
    pub form_analytics: Duration,
    /// Dashboard stats entries
    pub dashboard_stats: Duration,
    /// User engagement entries
    pub user_engagement: Duration,
    /// Raw response snapshots
    pub form_responses: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            form_analytics: Duration::from_secs(300),
            dashboard_stats: Duration::from_secs(300),
            user_engagement: Duration::from_secs(600),
            form_responses: Duration::from_secs(180),
        }
    }
}

// ============================================
// Cache facade
// ============================================

/// Key/value cache over aggregation results.
///
/// Constructed with an injected [`CacheStore`] so call sites (and tests)
/// decide where bytes live; there is no process-wide cache object.
pub struct AnalyticsCache {
    store: Box<dyn CacheStore>,
    ttls: CacheTtls,
}

impl AnalyticsCache {
    /// Create a cache over a store with the default TTL policy.
    pub fn new(store: Box<dyn CacheStore>) -> Self {
        Self::with_ttls(store, CacheTtls::default())
    }

    /// Create a cache over a store with an explicit TTL policy.
    pub fn with_ttls(store: Box<dyn CacheStore>, ttls: CacheTtls) -> Self {
        Self { store, ttls }
    }

    /// Fetch and deserialize a live entry; any failure is a miss.
    pub fn get<T: DeserializeOwned>(
        &self,
        kind: CacheKind,
        resource_id: &str,
        user_id: Option<i64>,
    ) -> Option<T> {
        let key = cache_key(kind, resource_id, user_id);
        let bytes = match self.store.get(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(%key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "Cache read failed; treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::debug!(%key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "Cached payload undeserializable; treating as miss");
                None
            }
        }
    }

    /// Serialize and store a value with the given TTL; failures are logged
    /// and dropped.
    pub fn set<T: Serialize>(
        &self,
        kind: CacheKind,
        resource_id: &str,
        user_id: Option<i64>,
        value: &T,
        ttl: Duration,
    ) {
        let key = cache_key(kind, resource_id, user_id);
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%key, error = %e, "Failed to serialize cache payload");
                return;
            }
        };

        if let Err(e) = self.store.set(&key, &bytes, ttl) {
            tracing::warn!(%key, error = %e, "Cache write failed");
        } else {
            tracing::debug!(%key, ttl_secs = ttl.as_secs(), "Cache set");
        }
    }

    /// Delete an entry unconditionally; absent entries and store failures
    /// are both no-ops.
    pub fn invalidate(&self, kind: CacheKind, resource_id: &str, user_id: Option<i64>) {
        let key = cache_key(kind, resource_id, user_id);
        if let Err(e) = self.store.delete(&key) {
            tracing::warn!(%key, error = %e, "Cache invalidation failed");
        } else {
            tracing::debug!(%key, "Cache invalidated");
        }
    }

    // ============================================
    // Form analytics
    // ============================================

    /// Cache a form's analytics payload.
    pub fn cache_form_analytics(&self, form_id: i64, analytics: &FormAnalytics) {
        self.set(
            CacheKind::FormAnalytics,
            &form_id.to_string(),
            None,
            analytics,
            self.ttls.form_analytics,
        );
    }

    /// Get a form's cached analytics, if live.
    pub fn get_cached_form_analytics(&self, form_id: i64) -> Option<FormAnalytics> {
        self.get(CacheKind::FormAnalytics, &form_id.to_string(), None)
    }

    /// Drop a form's cached analytics.
    pub fn invalidate_form_analytics(&self, form_id: i64) {
        self.invalidate(CacheKind::FormAnalytics, &form_id.to_string(), None);
    }

    // ============================================
    // Dashboard stats
    // ============================================

    /// Cache a user's dashboard statistics.
    pub fn cache_dashboard_stats(&self, user_id: i64, stats: &DashboardStats) {
        self.set(
            CacheKind::DashboardStats,
            DASHBOARD_RESOURCE_ID,
            Some(user_id),
            stats,
            self.ttls.dashboard_stats,
        );
    }

    /// Get a user's cached dashboard statistics, if live.
    pub fn get_cached_dashboard_stats(&self, user_id: i64) -> Option<DashboardStats> {
        self.get(CacheKind::DashboardStats, DASHBOARD_RESOURCE_ID, Some(user_id))
    }

    /// Drop a user's cached dashboard statistics.
    pub fn invalidate_dashboard_stats(&self, user_id: i64) {
        self.invalidate(CacheKind::DashboardStats, DASHBOARD_RESOURCE_ID, Some(user_id));
    }

    // ============================================
    // User engagement
    // ============================================

    /// Cache a user's engagement metrics.
    pub fn cache_user_engagement(&self, user_id: i64, engagement: &EngagementAnalytics) {
        self.set(
            CacheKind::UserEngagement,
            ENGAGEMENT_RESOURCE_ID,
            Some(user_id),
            engagement,
            self.ttls.user_engagement,
        );
    }

    /// Get a user's cached engagement metrics, if live.
    pub fn get_cached_user_engagement(&self, user_id: i64) -> Option<EngagementAnalytics> {
        self.get(CacheKind::UserEngagement, ENGAGEMENT_RESOURCE_ID, Some(user_id))
    }

    /// Drop a user's cached engagement metrics.
    pub fn invalidate_user_engagement(&self, user_id: i64) {
        self.invalidate(CacheKind::UserEngagement, ENGAGEMENT_RESOURCE_ID, Some(user_id));
    }

    // ============================================
    // Response snapshots
    // ============================================

    /// Cache a snapshot of a form's responses (payload shape is the
    /// caller's).
    pub fn cache_form_responses<T: Serialize>(&self, form_id: i64, responses: &T) {
        self.set(
            CacheKind::FormResponses,
            &form_id.to_string(),
            None,
            responses,
            self.ttls.form_responses,
        );
    }

    /// Get a form's cached response snapshot, if live.
    pub fn get_cached_form_responses<T: DeserializeOwned>(&self, form_id: i64) -> Option<T> {
        self.get(CacheKind::FormResponses, &form_id.to_string(), None)
    }

    /// Drop a form's cached response snapshot.
    pub fn invalidate_form_responses(&self, form_id: i64) {
        self.invalidate(CacheKind::FormResponses, &form_id.to_string(), None);
    }

    // ============================================
    // Composite invalidation
    // ============================================

    /// Drop everything cached for one form, plus its owner's dashboard.
    ///
    /// Must be called by every mutation path that adds, edits, or deletes a
    /// response, answer, or the form's question structure.
    pub fn invalidate_all_for_form(&self, form_id: i64, owning_user_id: i64) {
        self.invalidate_form_analytics(form_id);
        self.invalidate_form_responses(form_id);
        self.invalidate_dashboard_stats(owning_user_id);
    }

    /// Drop everything cached for a user and all the forms they own.
    ///
    /// The owned form ids are supplied by the caller; the cache performs no
    /// lookups of its own.
    pub fn invalidate_all_for_user(&self, user_id: i64, owned_form_ids: &[i64]) {
        self.invalidate_dashboard_stats(user_id);
        self.invalidate_user_engagement(user_id);
        for &form_id in owned_form_ids {
            self.invalidate_form_analytics(form_id);
            self.invalidate_form_responses(form_id);
        }
    }
}
