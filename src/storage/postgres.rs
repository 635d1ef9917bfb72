//! PostgreSQL storage backend

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{attach_answers, QnaStore};
use crate::types::{Answer, AnswerId, NewAnswer, NewQuestion, Question, QuestionId};
use crate::Result;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id BIGSERIAL PRIMARY KEY,
        text TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS answers (
        id BIGSERIAL PRIMARY KEY,
        question_id BIGINT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        text TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_answers_question_id ON answers(question_id)",
];

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        tracing::debug!(max_connections, "Connected to PostgreSQL");
        Ok(Self::from_pool(pool))
    }

    /// Wrap an already-established pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QnaStore for PostgresStore {
    async fn init_schema(&self) -> Result<()> {
        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        tracing::info!("PostgreSQL schema initialised");
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
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        attach_answers(&mut questions, answers);
        Ok(questions)
    }

    async fn create_question(&self, question: NewQuestion) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (text) VALUES ($1) RETURNING id, text, created_at",
        )
        .bind(question.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT id, text, created_at FROM questions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut question) = question else {
            return Ok(None);
        };

        question.answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, user_id, text, created_at
            FROM answers
            WHERE question_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(question))
    }

    async fn question_exists(&self, id: QuestionId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM questions WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_answer(&self, question_id: QuestionId, answer: NewAnswer) -> Result<Answer> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (question_id, user_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, question_id, user_id, text, created_at
            "#,
        )
        .bind(question_id)
        .bind(answer.user_id)
        .bind(answer.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(answer)
    }

    async fn get_answer(&self, id: AnswerId) -> Result<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>(
            "SELECT id, question_id, user_id, text, created_at FROM answers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(answer)
    }

    async fn delete_answer(&self, id: AnswerId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
