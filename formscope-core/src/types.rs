//! Core domain types for formscope
//!
//! These types are the materialized records the aggregation engine consumes.
//! They are owned and mutated by the persistence layer; the analytics core
//! only ever reads them. Callers hand the aggregators a snapshot of the
//! records they fetched (a form with its sections and questions, the
//! responses with their answers) and get a structurally complete result back.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Form** | A published or draft questionnaire owned by one user |
//! | **Section** | An ordered group of questions within a Form |
//! | **Question** | A single prompt with a fixed [`QuestionType`] |
//! | **Response** | One submission against a Form, optionally by a known user |
//! | **Answer** | One Response's payload for one Question |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Question types
// ============================================

/// The closed set of question types a form can contain.
///
/// A question's type is immutable once answers exist against it; the
/// aggregators branch on it to decide how an answer payload is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    LongText,
    MultipleChoice,
    Checkbox,
    Dropdown,
    Rating,
    FileUpload,
    Date,
    Email,
    Number,
}

impl QuestionType {
    /// Returns the identifier used in persisted records and cache payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::LongText => "long_text",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Rating => "rating",
            QuestionType::FileUpload => "file_upload",
            QuestionType::Date => "date",
            QuestionType::Email => "email",
            QuestionType::Number => "number",
        }
    }

    /// True for types whose answers are tallied as option labels
    pub fn is_option_bearing(&self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::Checkbox | QuestionType::Dropdown
        )
    }

    /// True for types whose answers are collected as free-form text
    pub fn is_free_text(&self) -> bool {
        matches!(
            self,
            QuestionType::Text | QuestionType::LongText | QuestionType::Email | QuestionType::Number
        )
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(QuestionType::Text),
            "long_text" => Ok(QuestionType::LongText),
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "checkbox" => Ok(QuestionType::Checkbox),
            "dropdown" => Ok(QuestionType::Dropdown),
            "rating" => Ok(QuestionType::Rating),
            "file_upload" => Ok(QuestionType::FileUpload),
            "date" => Ok(QuestionType::Date),
            "email" => Ok(QuestionType::Email),
            "number" => Ok(QuestionType::Number),
            _ => Err(format!("unknown question type: {}", s)),
        }
    }
}

// ============================================
// Form structure
// ============================================

/// A single question within a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier
    pub id: i64,
    /// Section this question belongs to
    pub section_id: i64,
    /// Type of question (fixed once answers exist)
    pub question_type: QuestionType,
    /// The prompt shown to respondents
    pub question_text: String,
    /// Whether respondents must answer this question
    pub is_required: bool,
    /// Ordering key within the section
    pub order: i32,
}

/// An ordered group of questions within a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier
    pub id: i64,
    /// Form this section belongs to
    pub form_id: i64,
    /// Section heading (optional)
    pub title: Option<String>,
    /// Ordering key within the form
    pub order: i32,
    /// Questions in this section
    pub questions: Vec<Question>,
}

/// A form with its full section/question tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique identifier
    pub id: i64,
    /// Form title
    pub title: String,
    /// Form description (optional)
    pub description: Option<String>,
    /// Whether the form is live and accepting responses
    pub is_published: bool,
    /// Owning user id
    pub created_by: i64,
    /// When the form was created
    pub created_at: DateTime<Utc>,
    /// When the form was published (if ever)
    pub published_at: Option<DateTime<Utc>>,
    /// Sections in this form
    pub sections: Vec<Section>,
}

impl Form {
    /// Flatten the form's questions in section order, then question order.
    ///
    /// Sections and questions are sorted by their `order` keys so callers
    /// can hand over records in whatever order the fetch produced them.
    pub fn flattened_questions(&self) -> Vec<&Question> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);

        let mut questions = Vec::new();
        for section in sections {
            let mut in_section: Vec<&Question> = section.questions.iter().collect();
            in_section.sort_by_key(|q| q.order);
            questions.extend(in_section);
        }
        questions
    }
}

// ============================================
// Responses and answers
// ============================================

/// One submission against a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Unique identifier
    pub id: i64,
    /// Form this response belongs to
    pub form_id: i64,
    /// Submitting user, if known (anonymous responses have none)
    pub user_id: Option<i64>,
    /// When the response was submitted
    pub submitted_at: Option<DateTime<Utc>>,
    /// Answers in this response (one per answered question; a response
    /// need not cover every question)
    pub answers: Vec<Answer>,
}

/// One response's payload for one question.
///
/// Two alternate payload fields exist: `answer_text` for plain text and
/// `answer_value` for structured data (a scalar or a list of scalars).
/// Which one is authoritative depends on the question type; see
/// [`crate::analytics::normalize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Unique identifier
    pub id: i64,
    /// Response this answer belongs to
    pub response_id: i64,
    /// Question this answer is for
    pub question_id: i64,
    /// Free-text payload
    pub answer_text: Option<String>,
    /// Structured payload (scalar or list; `null` counts as absent)
    pub answer_value: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_question_type_round_trip() {
        for ty in [
            QuestionType::Text,
            QuestionType::LongText,
            QuestionType::MultipleChoice,
            QuestionType::Checkbox,
            QuestionType::Dropdown,
            QuestionType::Rating,
            QuestionType::FileUpload,
            QuestionType::Date,
            QuestionType::Email,
            QuestionType::Number,
        ] {
            assert_eq!(QuestionType::from_str(ty.as_str()).unwrap(), ty);
        }
        assert!(QuestionType::from_str("slider").is_err());
    }

    #[test]
    fn test_question_type_classes() {
        assert!(QuestionType::Checkbox.is_option_bearing());
        assert!(QuestionType::Dropdown.is_option_bearing());
        assert!(!QuestionType::Rating.is_option_bearing());
        assert!(QuestionType::Email.is_free_text());
        assert!(QuestionType::Number.is_free_text());
        assert!(!QuestionType::FileUpload.is_free_text());
    }

    #[test]
    fn test_flattened_questions_order() {
        let question = |id, section_id, order| Question {
            id,
            section_id,
            question_type: QuestionType::Text,
            question_text: format!("q{}", id),
            is_required: false,
            order,
        };

        // Sections and questions intentionally out of order.
        let form = Form {
            id: 1,
            title: "Survey".to_string(),
            description: None,
            is_published: true,
            created_by: 10,
            created_at: Utc::now(),
            published_at: None,
            sections: vec![
                Section {
                    id: 2,
                    form_id: 1,
                    title: None,
                    order: 1,
                    questions: vec![question(4, 2, 1), question(3, 2, 0)],
                },
                Section {
                    id: 1,
                    form_id: 1,
                    title: None,
                    order: 0,
                    questions: vec![question(2, 1, 1), question(1, 1, 0)],
                },
            ],
        };

        let ids: Vec<i64> = form.flattened_questions().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
