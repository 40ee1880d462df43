//! Response trend aggregation
//!
//! Produces the bounded-window daily submission series behind the dashboard
//! trend charts: responses for one form over the trailing N days, grouped by
//! UTC calendar date.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Response;

/// One day's submission count in a trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// ISO date (`YYYY-MM-DD`, UTC calendar day)
    pub date: String,
    /// Responses submitted that day
    pub count: i64,
}

/// Daily response counts for a form over the trailing `window_days` days.
///
/// The series is ascending by date and sparse: days with no responses are
/// omitted, not zero-filled. Responses without a submission timestamp are
/// skipped.
pub fn aggregate_response_trend(
    form_id: i64,
    responses: &[Response],
    window_days: i64,
) -> Vec<TrendPoint> {
    let cutoff = Utc::now() - Duration::days(window_days);
    trend_since(form_id, responses, cutoff)
}

fn trend_since(form_id: i64, responses: &[Response], cutoff: DateTime<Utc>) -> Vec<TrendPoint> {
    // BTreeMap keyed by ISO date keeps the series in ascending date order.
    let mut daily: BTreeMap<String, i64> = BTreeMap::new();
    for response in responses {
        if response.form_id != form_id {
            continue;
        }
        let Some(ts) = response.submitted_at else {
            continue;
        };
        if ts < cutoff {
            continue;
        }
        *daily.entry(ts.format("%Y-%m-%d").to_string()).or_insert(0) += 1;
    }

    daily
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}
