//! Per-user engagement aggregation
//!
//! Computes statistics across every form a user owns: the all-time response
//! total and response counts bucketed by weekday and by hour of day, plus a
//! per-form popularity table.
//!
//! Bucketing reads the stored instant's calendar fields as-is, with no
//! timezone conversion. Timestamps are persisted in UTC, so for respondents
//! far from UTC the weekday/hour may not match their wall clock; that is a
//! known property of the data, not something this module corrects.

use chrono::Timelike;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{Form, Response};

/// Engagement statistics across all of one user's forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementAnalytics {
    /// All responses across the user's forms, unfiltered
    pub total_responses: i64,
    /// Weekday name ("Monday"…) to response count
    pub day_responses: IndexMap<String, i64>,
    /// Hour of day (0–23) to response count
    pub hour_responses: IndexMap<u32, i64>,
}

/// Aggregate engagement metrics over the responses to a user's forms.
///
/// Responses without a submission timestamp are counted in
/// `total_responses` but appear in neither time bucket.
pub fn aggregate_user_engagement(user_id: i64, responses: &[Response]) -> EngagementAnalytics {
    tracing::debug!(
        user_id,
        responses = responses.len(),
        "Aggregating user engagement"
    );

    let mut day_responses = IndexMap::new();
    for response in responses {
        if let Some(ts) = response.submitted_at {
            let day = ts.format("%A").to_string();
            *day_responses.entry(day).or_insert(0) += 1;
        }
    }

    let mut hour_responses = IndexMap::new();
    for response in responses {
        if let Some(ts) = response.submitted_at {
            *hour_responses.entry(ts.hour()).or_insert(0) += 1;
        }
    }

    EngagementAnalytics {
        total_responses: responses.len() as i64,
        day_responses,
        hour_responses,
    }
}

/// Response count per form, keyed by form title, in the given form order.
pub fn form_popularity(forms: &[Form], responses: &[Response]) -> IndexMap<String, i64> {
    let mut popularity = IndexMap::new();
    for form in forms {
        let count = responses.iter().filter(|r| r.form_id == form.id).count() as i64;
        popularity.insert(form.title.clone(), count);
    }
    popularity
}
