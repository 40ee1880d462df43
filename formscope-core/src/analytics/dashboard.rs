//! Owner dashboard aggregation
//!
//! Rolls a user's whole portfolio into the numbers the dashboard header and
//! charts show: form and response totals, recent activity, a trailing
//! 30-day submission series, and the top forms by response count. The
//! resulting struct is what gets cached under a user's dashboard-stats
//! entry.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::trend::TrendPoint;
use crate::types::{Form, Response};

/// Trailing window for the "recent responses" counter.
const RECENT_WINDOW_DAYS: i64 = 7;
/// Trailing window for the dashboard chart series.
const CHART_WINDOW_DAYS: i64 = 30;
/// How many top forms the dashboard lists.
const TOP_FORMS_LIMIT: usize = 5;

/// Response count for one form, for the top-forms list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormResponseCount {
    /// Form id
    pub form_id: i64,
    /// Form title, carried through for rendering
    pub title: String,
    /// Responses received by this form
    pub response_count: i64,
}

/// Dashboard statistics for one user's portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Forms the user owns
    pub total_forms: i64,
    /// Responses across all of those forms
    pub total_responses: i64,
    /// Responses in the trailing seven days
    pub recent_responses: i64,
    /// Daily submission counts over the trailing thirty days (sparse,
    /// ascending by date)
    pub chart_data: Vec<TrendPoint>,
    /// Up to five forms, by response count descending
    pub top_forms: Vec<FormResponseCount>,
}

/// Aggregate dashboard statistics for a user's forms and their responses.
///
/// `forms` is the user's portfolio; `responses` is every response across
/// those forms.
pub fn aggregate_dashboard(user_id: i64, forms: &[Form], responses: &[Response]) -> DashboardStats {
    tracing::debug!(
        user_id,
        forms = forms.len(),
        responses = responses.len(),
        "Aggregating dashboard stats"
    );

    let now = Utc::now();
    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let chart_cutoff = now - Duration::days(CHART_WINDOW_DAYS);

    let recent_responses = responses
        .iter()
        .filter(|r| r.submitted_at.is_some_and(|ts| ts >= recent_cutoff))
        .count() as i64;

    let mut daily: BTreeMap<String, i64> = BTreeMap::new();
    for response in responses {
        if let Some(ts) = response.submitted_at {
            if ts >= chart_cutoff {
                *daily.entry(ts.format("%Y-%m-%d").to_string()).or_insert(0) += 1;
            }
        }
    }
    let chart_data = daily
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect();

    let mut form_counts: Vec<FormResponseCount> = forms
        .iter()
        .map(|form| FormResponseCount {
            form_id: form.id,
            title: form.title.clone(),
            response_count: responses.iter().filter(|r| r.form_id == form.id).count() as i64,
        })
        .collect();
    // Stable sort keeps the input form order among ties.
    form_counts.sort_by(|a, b| b.response_count.cmp(&a.response_count));
    form_counts.truncate(TOP_FORMS_LIMIT);

    DashboardStats {
        total_forms: forms.len() as i64,
        total_responses: responses.len() as i64,
        recent_responses,
        chart_data,
        top_forms: form_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn form(id: i64, title: &str) -> Form {
        Form {
            id,
            title: title.to_string(),
            description: None,
            is_published: true,
            created_by: 10,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            published_at: None,
            sections: vec![],
        }
    }

    fn response(id: i64, form_id: i64, ts: Option<DateTime<Utc>>) -> Response {
        Response {
            id,
            form_id,
            user_id: None,
            submitted_at: ts,
            answers: vec![],
        }
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        Utc::now() - Duration::days(days)
    }

    #[test]
    fn test_totals_and_recent_window() {
        let forms = vec![form(1, "A"), form(2, "B")];
        let responses = vec![
            response(1, 1, Some(days_ago(1))),
            response(2, 1, Some(days_ago(10))),
            response(3, 2, None),
        ];

        let stats = aggregate_dashboard(10, &forms, &responses);
        assert_eq!(stats.total_forms, 2);
        assert_eq!(stats.total_responses, 3);
        assert_eq!(stats.recent_responses, 1);
    }

    #[test]
    fn test_chart_window_and_order() {
        let forms = vec![form(1, "A")];
        let responses = vec![
            response(1, 1, Some(days_ago(45))),
            response(2, 1, Some(days_ago(5))),
            response(3, 1, Some(days_ago(2))),
            response(4, 1, Some(days_ago(2))),
        ];

        let stats = aggregate_dashboard(10, &forms, &responses);
        assert_eq!(stats.chart_data.len(), 2);
        assert!(stats.chart_data[0].date < stats.chart_data[1].date);
        assert_eq!(stats.chart_data[1].count, 2);
    }

    #[test]
    fn test_top_forms_sorted_and_capped() {
        let forms: Vec<Form> = (1..=7).map(|i| form(i, &format!("Form {}", i))).collect();
        let mut responses = Vec::new();
        let mut next_id = 1;
        // Form 3 gets 3 responses, form 6 gets 2, form 1 gets 1.
        for (form_id, count) in [(3i64, 3), (6, 2), (1, 1)] {
            for _ in 0..count {
                responses.push(response(next_id, form_id, Some(days_ago(1))));
                next_id += 1;
            }
        }

        let stats = aggregate_dashboard(10, &forms, &responses);
        assert_eq!(stats.top_forms.len(), 5);
        assert_eq!(stats.top_forms[0].form_id, 3);
        assert_eq!(stats.top_forms[1].form_id, 6);
        assert_eq!(stats.top_forms[2].form_id, 1);
        // Zero-count ties keep portfolio order.
        assert_eq!(stats.top_forms[3].form_id, 2);
        assert_eq!(stats.top_forms[4].form_id, 4);
    }

    #[test]
    fn test_empty_portfolio() {
        let stats = aggregate_dashboard(10, &[], &[]);
        assert_eq!(stats.total_forms, 0);
        assert_eq!(stats.total_responses, 0);
        assert_eq!(stats.recent_responses, 0);
        assert!(stats.chart_data.is_empty());
        assert!(stats.top_forms.is_empty());
    }
}
