//! Answer normalization
//!
//! Raw answers carry two alternate payload fields (free text and a
//! structured JSON value). The historical data behind these records is
//! dirty: ratings stored as unparsable strings, payloads that are `null`,
//! scalars where lists are expected. Normalization decides once, up front,
//! what an answer means for aggregation; the aggregators then match on the
//! resulting tag instead of re-inspecting payloads at every site.
//!
//! Malformed or missing data never produces an error. It degrades to
//! exclusion: an unparsable rating stays out of the rating statistics, an
//! answer with neither payload is [`NormalizedAnswer::Empty`] and is
//! excluded from every aggregate. The engine must keep producing results
//! over old data, so exclusion is the only failure mode here.

use crate::types::{Answer, QuestionType};

/// Canonical form of one raw answer, decided by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedAnswer {
    /// A single selected option label
    Choice(String),
    /// Multiple selected option labels (checkbox-style multi-select)
    Choices(Vec<String>),
    /// A successfully parsed rating
    Rating(i64),
    /// Free-form text (also the resting place of unparsable rating text)
    Text(String),
    /// Neither payload field was usable
    Empty,
}

impl NormalizedAnswer {
    /// Empty answers are excluded from every aggregate.
    pub fn is_empty(&self) -> bool {
        matches!(self, NormalizedAnswer::Empty)
    }
}

/// Normalize one raw answer against its question's declared type.
///
/// The structured value wins over free text when both are present. A
/// structured list becomes [`NormalizedAnswer::Choices`] regardless of
/// question type; scalars (structured or text) are dispatched by type:
/// option-bearing types yield [`NormalizedAnswer::Choice`], rating
/// questions attempt an integer parse (failure lands in
/// [`NormalizedAnswer::Text`], keeping the answer countable without
/// polluting the rating tallies), and everything else yields
/// [`NormalizedAnswer::Text`].
pub fn normalize(answer: &Answer, question_type: QuestionType) -> NormalizedAnswer {
    if let Some(value) = answer.answer_value.as_ref().filter(|v| !v.is_null()) {
        if let Some(items) = value.as_array() {
            return NormalizedAnswer::Choices(items.iter().map(scalar_to_string).collect());
        }
        return scalar(scalar_to_string(value), question_type);
    }

    if let Some(text) = answer.answer_text.as_deref().filter(|t| !t.is_empty()) {
        return scalar(text.to_string(), question_type);
    }

    NormalizedAnswer::Empty
}

fn scalar(value: String, question_type: QuestionType) -> NormalizedAnswer {
    if question_type == QuestionType::Rating {
        return match value.trim().parse::<i64>() {
            Ok(rating) => NormalizedAnswer::Rating(rating),
            Err(_) => NormalizedAnswer::Text(value),
        };
    }

    if question_type.is_option_bearing() {
        NormalizedAnswer::Choice(value)
    } else {
        NormalizedAnswer::Text(value)
    }
}

/// Coerce one JSON scalar to the string label used in tallies.
///
/// Strings are kept verbatim (no surrounding quotes); anything else falls
/// back to its compact JSON rendering.
fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answer(text: Option<&str>, value: Option<serde_json::Value>) -> Answer {
        Answer {
            id: 1,
            response_id: 1,
            question_id: 1,
            answer_text: text.map(|t| t.to_string()),
            answer_value: value,
        }
    }

    #[test]
    fn test_structured_list_becomes_choices() {
        let a = answer(None, Some(json!(["A", "B", 3])));
        assert_eq!(
            normalize(&a, QuestionType::Checkbox),
            NormalizedAnswer::Choices(vec!["A".into(), "B".into(), "3".into()])
        );
    }

    #[test]
    fn test_structured_scalar_wins_over_text() {
        let a = answer(Some("ignored"), Some(json!("Blue")));
        assert_eq!(
            normalize(&a, QuestionType::Dropdown),
            NormalizedAnswer::Choice("Blue".into())
        );
    }

    #[test]
    fn test_structured_number_is_stringified() {
        let a = answer(None, Some(json!(7)));
        assert_eq!(
            normalize(&a, QuestionType::MultipleChoice),
            NormalizedAnswer::Choice("7".into())
        );
    }

    #[test]
    fn test_null_value_falls_back_to_text() {
        let a = answer(Some("hello"), Some(serde_json::Value::Null));
        assert_eq!(
            normalize(&a, QuestionType::Text),
            NormalizedAnswer::Text("hello".into())
        );
    }

    #[test]
    fn test_rating_parses_from_text() {
        let a = answer(Some("5"), None);
        assert_eq!(normalize(&a, QuestionType::Rating), NormalizedAnswer::Rating(5));
    }

    #[test]
    fn test_rating_parses_from_structured_scalar() {
        let a = answer(None, Some(json!(4)));
        assert_eq!(normalize(&a, QuestionType::Rating), NormalizedAnswer::Rating(4));
    }

    #[test]
    fn test_unparsable_rating_stays_text() {
        let a = answer(Some("oops"), None);
        assert_eq!(
            normalize(&a, QuestionType::Rating),
            NormalizedAnswer::Text("oops".into())
        );
    }

    #[test]
    fn test_empty_when_nothing_usable() {
        assert_eq!(normalize(&answer(None, None), QuestionType::Text), NormalizedAnswer::Empty);
        assert_eq!(normalize(&answer(Some(""), None), QuestionType::Text), NormalizedAnswer::Empty);
    }

    #[test]
    fn test_free_text_type_yields_text() {
        let a = answer(Some("me@example.com"), None);
        assert_eq!(
            normalize(&a, QuestionType::Email),
            NormalizedAnswer::Text("me@example.com".into())
        );
    }
}
