//! API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use crate::api::{ApiError, AppState};
use crate::types::{Answer, NewAnswer, NewQuestion, Question};
use crate::Error;

/// Health check with store status
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Store ping failed");
        ApiError::service_unavailable("store unavailable")
    })?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// List every question with its answers
pub async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = state.store.list_questions().await?;
    Ok(Json(questions))
}

/// Create a question
pub async fn create_question(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let payload: NewQuestion = parse_body(&body)?;

    let question = state.store.create_question(payload).await?;
    tracing::info!(question_id = question.id, "Question created");

    Ok((StatusCode::CREATED, Json(question)))
}

/// Fetch a question with its answers
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Question>, ApiError> {
    let id = route_id(&id).ok_or_else(|| Error::not_found(format!("Question {}", id)))?;

    let question = state
        .store
        .get_question(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question {}", id)))?;

    Ok(Json(question))
}

/// Delete a question and its answers. Succeeds whether or not it existed.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = route_id(&id).ok_or_else(|| Error::not_found(format!("Question {}", id)))?;

    let removed = state.store.delete_question(id).await?;
    tracing::debug!(question_id = id, removed, "Question delete");

    Ok(StatusCode::NO_CONTENT)
}

/// Create an answer under a question
///
/// The existence check and the insert are separate storage calls. A
/// concurrent delete of the question between the two surfaces as a storage
/// error from the foreign key.
pub async fn create_answer(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Answer>), ApiError> {
    let question_id = route_id(&question_id).ok_or_else(|| {
        Error::invalid_request(format!("bad question id '{}'", question_id))
    })?;
    let payload: NewAnswer = parse_body(&body)?;

    if !state.store.question_exists(question_id).await? {
        return Err(Error::not_found(format!("Question {}", question_id)).into());
    }

    let answer = state.store.create_answer(question_id, payload).await?;
    tracing::info!(
        answer_id = answer.id,
        question_id,
        user_id = %answer.user_id,
        "Answer created"
    );

    Ok((StatusCode::CREATED, Json(answer)))
}

/// Fetch a single answer
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Answer>, ApiError> {
    let id = route_id(&id).ok_or_else(|| Error::not_found(format!("Answer {}", id)))?;

    let answer = state
        .store
        .get_answer(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Answer {}", id)))?;

    Ok(Json(answer))
}

/// Delete an answer. Succeeds whether or not it existed.
pub async fn delete_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = route_id(&id).ok_or_else(|| Error::not_found(format!("Answer {}", id)))?;

    let removed = state.store.delete_answer(id).await?;
    tracing::debug!(answer_id = id, removed, "Answer delete");

    Ok(StatusCode::NO_CONTENT)
}

/// Parse a path segment that must be a non-empty run of ASCII digits
fn route_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Decode a JSON body, ignoring the Content-Type header
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> crate::Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| Error::invalid_request(format!("invalid request body: {}", e)))
}
