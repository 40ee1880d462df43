//! Form-wide aggregation
//!
//! Walks a form's flattened question list against a snapshot of its
//! responses and produces the full analytics payload the form dashboard
//! renders (and the cache layer stores): per-question statistics, response
//! counts, a day-bucketed submission series, and the raw completion-rate
//! inputs.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::question::{aggregate_question, QuestionAnalytics};
use crate::types::{Answer, Form, Response};

/// An inclusive submission-time window.
///
/// Either bound may be absent, leaving that side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest admitted submission time (inclusive)
    pub start: Option<DateTime<Utc>>,
    /// Latest admitted submission time (inclusive)
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Whether a timestamp falls inside the window, bounds included.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if ts > end {
                return false;
            }
        }
        true
    }

    fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Time-bucketed submission counts for a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeAnalytics {
    /// Responses in the (possibly filtered) snapshot
    pub total_responses: i64,
    /// ISO date (`YYYY-MM-DD`, UTC calendar day) to submission count
    pub responses_over_time: IndexMap<String, i64>,
}

/// Raw inputs for completion-rate framing.
///
/// Not a percentage: the counts are exposed as-is and the UI decides how
/// to frame them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionInputs {
    /// Questions across the form with `is_required` set
    pub required_questions_count: i64,
    /// Responses received
    pub total_responses: i64,
}

/// Complete analytics payload for one form.
///
/// This struct is also the serialized shape of a cached `form_analytics`
/// entry. It is always structurally complete: a form with no sections or no
/// responses yields zero counts and empty collections, never absent fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormAnalytics {
    /// Responses in the (possibly filtered) snapshot
    pub response_count: i64,
    /// Per-question statistics, in section-then-question order
    pub analytics_data: Vec<QuestionAnalytics>,
    /// Day-bucketed submission series
    pub time_analytics: TimeAnalytics,
    /// Count of required questions across the form
    pub required_questions: i64,
}

/// Aggregate a form's responses into [`FormAnalytics`].
///
/// When `date_range` is given, responses are filtered before any
/// per-question work, so an excluded response contributes no answers to any
/// question. A response without a submission timestamp survives only a
/// fully unbounded range.
pub fn aggregate_form(
    form: &Form,
    responses: &[Response],
    date_range: Option<&DateRange>,
) -> FormAnalytics {
    let filtered = filter_responses(responses, date_range);
    let questions = form.flattened_questions();

    tracing::debug!(
        form_id = form.id,
        questions = questions.len(),
        responses = filtered.len(),
        filtered = date_range.is_some(),
        "Aggregating form analytics"
    );

    let mut analytics_data = Vec::with_capacity(questions.len());
    for &question in &questions {
        let answers: Vec<&Answer> = filtered
            .iter()
            .flat_map(|r| r.answers.iter())
            .filter(|a| a.question_id == question.id)
            .collect();
        analytics_data.push(aggregate_question(question, &answers));
    }

    let mut responses_over_time = IndexMap::new();
    for response in &filtered {
        if let Some(ts) = response.submitted_at {
            let date = ts.format("%Y-%m-%d").to_string();
            *responses_over_time.entry(date).or_insert(0) += 1;
        }
    }

    let required_questions = questions.iter().filter(|q| q.is_required).count() as i64;

    FormAnalytics {
        response_count: filtered.len() as i64,
        analytics_data,
        time_analytics: TimeAnalytics {
            total_responses: filtered.len() as i64,
            responses_over_time,
        },
        required_questions,
    }
}

/// Count the form's required questions alongside its response total.
pub fn completion_inputs(form: &Form, responses: &[Response]) -> CompletionInputs {
    let required_questions_count = form
        .flattened_questions()
        .iter()
        .filter(|q| q.is_required)
        .count() as i64;

    CompletionInputs {
        required_questions_count,
        total_responses: responses.len() as i64,
    }
}

fn filter_responses<'a>(
    responses: &'a [Response],
    date_range: Option<&DateRange>,
) -> Vec<&'a Response> {
    match date_range {
        None => responses.iter().collect(),
        Some(range) => responses
            .iter()
            .filter(|r| match r.submitted_at {
                Some(ts) => range.contains(ts),
                // Unstamped responses only survive a window with no bounds.
                None => range.is_unbounded(),
            })
            .collect(),
    }
}
