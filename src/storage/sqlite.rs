//! SQLite storage backend

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{attach_answers, QnaStore};
use crate::types::{Answer, AnswerId, NewAnswer, NewQuestion, Question, QuestionId};
use crate::Result;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_answers_question_id ON answers(question_id)",
];

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to a SQLite database, creating the file if missing.
    ///
    /// An in-memory URL is pinned to a single long-lived connection, since
    /// every SQLite connection opens its own private in-memory database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(options)
                .await?
        };

        tracing::debug!(url, "Connected to SQLite");
        Ok(Self { pool })
    }

    /// Fresh in-memory database with the schema already applied
    pub async fn in_memory() -> Result<Self> {
        let store = Self::connect("sqlite::memory:", 1).await?;
        store.init_schema().await?;
        Ok(store)
    }

    // AUTOINCREMENT ids never repeat, so id order is creation order
    async fn answers_for(&self, question_id: QuestionId) -> Result<Vec<Answer>> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, user_id, text, created_at
            FROM answers
            WHERE question_id = ?
            ORDER BY id
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}

/// Both `sqlite::memory:` and URI forms such as `sqlite:file:qna?mode=memory`
fn is_memory_url(url: &str) -> bool {
    if url.contains(":memory:") {
        return true;
    }
    url.split_once('?').is_some_and(|(_, params)| {
        params
            .split('&')
            .any(|param| param.eq_ignore_ascii_case("mode=memory"))
    })
}

#[async_trait]
impl QnaStore for SqliteStore {
    async fn init_schema(&self) -> Result<()> {
        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        tracing::info!("SQLite schema initialised");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<Question>> {
        let mut questions = sqlx::query_as::<_, Question>(
            "SELECT id, text, created_at FROM questions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, user_id, text, created_at
            FROM answers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        attach_answers(&mut questions, answers);
        Ok(questions)
    }

    async fn create_question(&self, question: NewQuestion) -> Result<Question> {
        let created_at = Utc::now();

        let id = sqlx::query("INSERT INTO questions (text, created_at) VALUES (?, ?)")
            .bind(&question.text)
            .bind(created_at)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Question {
            id,
            text: question.text,
            created_at,
            answers: Vec::new(),
        })
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT id, text, created_at FROM questions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match question {
            Some(mut question) => {
                question.answers = self.answers_for(id).await?;
                Ok(Some(question))
            }
            None => Ok(None),
        }
    }

    async fn question_exists(&self, id: QuestionId) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM questions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn delete_question(&self, id: QuestionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_answer(&self, question_id: QuestionId, answer: NewAnswer) -> Result<Answer> {
        let created_at = Utc::now();

        let id = sqlx::query(
            "INSERT INTO answers (question_id, user_id, text, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(question_id)
        .bind(&answer.user_id)
        .bind(&answer.text)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Answer {
            id,
            question_id,
            user_id: answer.user_id,
            text: answer.text,
            created_at,
        })
    }

    async fn get_answer(&self, id: AnswerId) -> Result<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>(
            "SELECT id, question_id, user_id, text, created_at FROM answers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(answer)
    }

    async fn delete_answer(&self, id: AnswerId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM answers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
