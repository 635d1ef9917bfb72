//! Storage abstraction layer
//!
//! Provides a unified interface over the relational backends that hold
//! questions and answers.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::{Answer, AnswerId, NewAnswer, NewQuestion, Question, QuestionId};
use crate::Result;

pub mod postgres;
pub mod sqlite;

/// Storage handle shared by every request
///
/// Each call is independent; a sequence of calls made by one request is not
/// atomic.
#[async_trait]
pub trait QnaStore: Send + Sync {
    /// Create tables and indexes if they do not exist yet
    async fn init_schema(&self) -> Result<()>;

    /// Check the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// All questions with their answers preloaded, ordered by id
    async fn list_questions(&self) -> Result<Vec<Question>>;

    /// Persist a question, assigning its id and creation time
    async fn create_question(&self, question: NewQuestion) -> Result<Question>;

    /// Look up a question with its answers preloaded
    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>>;

    async fn question_exists(&self, id: QuestionId) -> Result<bool>;

    /// Delete a question and, through the foreign key, all of its answers.
    /// Returns whether a row was removed.
    async fn delete_question(&self, id: QuestionId) -> Result<bool>;

    /// Persist an answer owned by `question_id`
    async fn create_answer(&self, question_id: QuestionId, answer: NewAnswer) -> Result<Answer>;

    async fn get_answer(&self, id: AnswerId) -> Result<Option<Answer>>;

    /// Returns whether a row was removed
    async fn delete_answer(&self, id: AnswerId) -> Result<bool>;
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Sqlite { url: String, max_connections: u32 },
    Postgres { url: String, max_connections: u32 },
}

/// Create storage backend from config
pub async fn create_storage(config: StorageConfig) -> Result<Box<dyn QnaStore>> {
    match config {
        StorageConfig::Sqlite {
            url,
            max_connections,
        } => {
            let backend = sqlite::SqliteStore::connect(&url, max_connections).await?;
            Ok(Box::new(backend))
        }
        StorageConfig::Postgres {
            url,
            max_connections,
        } => {
            let backend = postgres::PostgresStore::connect(&url, max_connections).await?;
            Ok(Box::new(backend))
        }
    }
}

/// Distribute answers (already in creation order) onto their questions
pub(crate) fn attach_answers(questions: &mut [Question], answers: Vec<Answer>) {
    let mut by_question: HashMap<QuestionId, Vec<Answer>> = HashMap::new();
    for answer in answers {
        by_question
            .entry(answer.question_id)
            .or_default()
            .push(answer);
    }

    for question in questions.iter_mut() {
        if let Some(answers) = by_question.remove(&question.id) {
            question.answers = answers;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(id: QuestionId) -> Question {
        Question {
            id,
            text: format!("question {id}"),
            created_at: Utc::now(),
            answers: Vec::new(),
        }
    }

    fn answer(id: AnswerId, question_id: QuestionId) -> Answer {
        Answer {
            id,
            question_id,
            user_id: "u1".to_string(),
            text: format!("answer {id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn attach_answers_groups_by_owner_and_keeps_order() {
        let mut questions = vec![question(1), question(2), question(3)];
        let answers = vec![answer(10, 2), answer(11, 1), answer(12, 2), answer(13, 99)];

        attach_answers(&mut questions, answers);

        assert_eq!(questions[0].answers.iter().map(|a| a.id).collect::<Vec<_>>(), vec![11]);
        assert_eq!(
            questions[1].answers.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![10, 12]
        );
        assert!(questions[2].answers.is_empty());
    }
}
