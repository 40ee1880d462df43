//! Per-question aggregation
//!
//! Turns one question's full answer set into the statistics the dashboards
//! render: option-frequency tables for choice questions, a distribution and
//! mean for ratings, the raw text collection for free-form questions, and a
//! plain count for everything else.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::normalize::{normalize, NormalizedAnswer};
use crate::types::{Answer, Question, QuestionType};

/// Aggregated statistics for a single question.
///
/// `answers` is always present (empty when the question type routes its data
/// elsewhere); label order is first-seen order, no sorting. `average_rating`
/// is emitted only when at least one rating parsed; absence signals "no
/// data". `responses` is emitted only for free-text question types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnalytics {
    /// Question id
    pub question_id: i64,
    /// The prompt, carried through for rendering
    pub question_text: String,
    /// Question type
    pub question_type: QuestionType,
    /// Count of answers that normalized to something non-empty
    pub total_responses: i64,
    /// Option label (or stringified rating) to count
    pub answers: IndexMap<String, i64>,
    /// Arithmetic mean of successfully parsed ratings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Raw non-empty text values, for free-text question types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<String>>,
}

/// Aggregate one question's answers into [`QuestionAnalytics`].
///
/// Empty answers are dropped before anything is counted; everything that
/// survives contributes to `total_responses`, even values (like unparsable
/// rating text) that no type-specific tally wants.
pub fn aggregate_question(question: &Question, answers: &[&Answer]) -> QuestionAnalytics {
    let normalized: Vec<NormalizedAnswer> = answers
        .iter()
        .map(|a| normalize(a, question.question_type))
        .filter(|n| !n.is_empty())
        .collect();

    let mut analytics = QuestionAnalytics {
        question_id: question.id,
        question_text: question.question_text.clone(),
        question_type: question.question_type,
        total_responses: normalized.len() as i64,
        answers: IndexMap::new(),
        average_rating: None,
        responses: None,
    };

    if question.question_type.is_option_bearing() {
        for value in &normalized {
            match value {
                NormalizedAnswer::Choices(labels) => {
                    // One increment per selected element.
                    for label in labels {
                        *analytics.answers.entry(label.clone()).or_insert(0) += 1;
                    }
                }
                NormalizedAnswer::Choice(label) => {
                    *analytics.answers.entry(label.clone()).or_insert(0) += 1;
                }
                _ => {}
            }
        }
    } else if question.question_type == QuestionType::Rating {
        let mut ratings = Vec::new();
        for value in &normalized {
            if let NormalizedAnswer::Rating(rating) = value {
                ratings.push(*rating);
                *analytics.answers.entry(rating.to_string()).or_insert(0) += 1;
            }
        }
        if !ratings.is_empty() {
            let sum: i64 = ratings.iter().sum();
            analytics.average_rating = Some(sum as f64 / ratings.len() as f64);
        }
    } else if question.question_type.is_free_text() {
        analytics.responses = Some(
            normalized
                .iter()
                .filter_map(|value| match value {
                    NormalizedAnswer::Text(text) => Some(text.clone()),
                    _ => None,
                })
                .collect(),
        );
    } else {
        analytics
            .answers
            .insert("total_responses".to_string(), normalized.len() as i64);
    }

    analytics
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(ty: QuestionType) -> Question {
        Question {
            id: 7,
            section_id: 1,
            question_type: ty,
            question_text: "How was it?".to_string(),
            is_required: false,
            order: 0,
        }
    }

    fn text_answer(id: i64, text: &str) -> Answer {
        Answer {
            id,
            response_id: id,
            question_id: 7,
            answer_text: Some(text.to_string()),
            answer_value: None,
        }
    }

    fn value_answer(id: i64, value: serde_json::Value) -> Answer {
        Answer {
            id,
            response_id: id,
            question_id: 7,
            answer_text: None,
            answer_value: Some(value),
        }
    }

    #[test]
    fn test_checkbox_list_counts_each_element() {
        let q = question(QuestionType::Checkbox);
        let a = value_answer(1, json!(["A", "B", "A"]));
        let refs = vec![&a];

        let analytics = aggregate_question(&q, &refs);
        assert_eq!(analytics.total_responses, 1);
        assert_eq!(analytics.answers.get("A"), Some(&2));
        assert_eq!(analytics.answers.get("B"), Some(&1));
    }

    #[test]
    fn test_option_labels_keep_first_seen_order() {
        let q = question(QuestionType::MultipleChoice);
        let answers = vec![
            value_answer(1, json!("Banana")),
            value_answer(2, json!("Apple")),
            value_answer(3, json!("Banana")),
        ];
        let refs: Vec<&Answer> = answers.iter().collect();

        let analytics = aggregate_question(&q, &refs);
        let labels: Vec<&String> = analytics.answers.keys().collect();
        assert_eq!(labels, vec!["Banana", "Apple"]);
    }

    #[test]
    fn test_rating_mean_skips_unparsable() {
        let q = question(QuestionType::Rating);
        let answers = vec![
            text_answer(1, "5"),
            text_answer(2, "4"),
            text_answer(3, "oops"),
            text_answer(4, "3"),
        ];
        let refs: Vec<&Answer> = answers.iter().collect();

        let analytics = aggregate_question(&q, &refs);
        // "oops" still counts as an answered row, just not as a rating.
        assert_eq!(analytics.total_responses, 4);
        assert_eq!(analytics.average_rating, Some(4.0));
        assert_eq!(analytics.answers.get("5"), Some(&1));
        assert_eq!(analytics.answers.get("4"), Some(&1));
        assert_eq!(analytics.answers.get("3"), Some(&1));
        assert!(!analytics.answers.contains_key("oops"));
    }

    #[test]
    fn test_rating_without_valid_values_omits_average() {
        let q = question(QuestionType::Rating);
        let a = text_answer(1, "meh");
        let refs = vec![&a];

        let analytics = aggregate_question(&q, &refs);
        assert_eq!(analytics.total_responses, 1);
        assert_eq!(analytics.average_rating, None);
        assert!(analytics.answers.is_empty());

        let serialized = serde_json::to_value(&analytics).unwrap();
        assert!(serialized.get("average_rating").is_none());
    }

    #[test]
    fn test_text_question_collects_values() {
        let q = question(QuestionType::LongText);
        let answers = vec![text_answer(1, "great"), text_answer(2, "")];
        let refs: Vec<&Answer> = answers.iter().collect();

        let analytics = aggregate_question(&q, &refs);
        assert_eq!(analytics.total_responses, 1);
        assert_eq!(analytics.responses, Some(vec!["great".to_string()]));
        assert!(analytics.answers.is_empty());
    }

    #[test]
    fn test_fallback_type_reports_count_bucket() {
        let q = question(QuestionType::FileUpload);
        let answers = vec![
            text_answer(1, "upload-1.pdf"),
            text_answer(2, "upload-2.pdf"),
            Answer {
                id: 3,
                response_id: 3,
                question_id: 7,
                answer_text: None,
                answer_value: None,
            },
        ];
        let refs: Vec<&Answer> = answers.iter().collect();

        let analytics = aggregate_question(&q, &refs);
        assert_eq!(analytics.total_responses, 2);
        assert_eq!(analytics.answers.get("total_responses"), Some(&2));
    }

    #[test]
    fn test_empty_answers_do_not_count() {
        let q = question(QuestionType::Dropdown);
        let a = Answer {
            id: 1,
            response_id: 1,
            question_id: 7,
            answer_text: None,
            answer_value: Some(serde_json::Value::Null),
        };
        let refs = vec![&a];

        let analytics = aggregate_question(&q, &refs);
        assert_eq!(analytics.total_responses, 0);
        assert!(analytics.answers.is_empty());
    }
}
