//! qna-api - a question and answer HTTP service
//!
//! Questions own an ordered collection of answers. The crate provides:
//! - A relational storage layer (SQLite or PostgreSQL via sqlx)
//! - An axum operation layer translating HTTP requests into storage calls
//! - Configuration loading for the server binary

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
