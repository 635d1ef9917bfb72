//! Core types for qna-api

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Question identity, assigned by storage
pub type QuestionId = i64;

/// Answer identity, assigned by storage
pub type AnswerId = i64;

/// A posted question together with the answers it owns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Ordered by creation; omitted from JSON when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[sqlx(skip)]
    pub answers: Vec<Answer>,
}

/// A response to exactly one question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    /// Author identifier. Documented as a UUID but stored as given.
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
}

/// Request body for creating an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnswer {
    pub user_id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn question_without_answers_omits_field() {
        let question = Question {
            id: 1,
            text: "Q?".to_string(),
            created_at: ts(),
            answers: Vec::new(),
        };

        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["text"], "Q?");
        assert!(value.get("answers").is_none());
        assert!(value["created_at"].is_string());
    }

    #[test]
    fn question_with_answers_nests_them() {
        let question = Question {
            id: 7,
            text: "Q?".to_string(),
            created_at: ts(),
            answers: vec![Answer {
                id: 3,
                question_id: 7,
                user_id: "u1".to_string(),
                text: "A1".to_string(),
                created_at: ts(),
            }],
        };

        let value = serde_json::to_value(&question).unwrap();
        let answers = value["answers"].as_array().unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0]["question_id"], 7);
        assert_eq!(answers[0]["user_id"], "u1");
    }

    #[test]
    fn new_answer_requires_both_fields() {
        assert!(serde_json::from_str::<NewAnswer>(r#"{"text":"A1"}"#).is_err());
        let parsed: NewAnswer =
            serde_json::from_str(r#"{"user_id":"not-a-uuid","text":"A1","extra":true}"#).unwrap();
        assert_eq!(parsed.user_id, "not-a-uuid");
    }
}
