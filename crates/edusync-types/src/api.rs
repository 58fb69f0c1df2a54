use serde::{Deserialize, Serialize};

use crate::models::Lecture;

// -- Session --

/// Claims carried by the session token issued on login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// -- Auth --

/// Fields are optional so that a missing field is a validation error (400)
/// rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

// -- Completions --

#[derive(Debug, Default, Deserialize)]
pub struct TranscriptRequest {
    pub transcript: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub quiz: String,
}

// -- Lectures --

/// The browser keeps the user id in local storage, so it comes back either as
/// a JSON number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserIdInput {
    Number(i64),
    Text(String),
}

impl UserIdInput {
    /// Returns the id if it is a positive integer.
    pub fn resolve(&self) -> Option<i64> {
        let id = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        (id > 0).then_some(id)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveLectureRequest {
    pub user_id: Option<UserIdInput>,
    pub title: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub quiz: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveLectureResponse {
    pub message: String,
    pub lecture_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LecturesResponse {
    pub lectures: Vec<Lecture>,
}

// -- Export --

#[derive(Debug, Default, Deserialize)]
pub struct GeneratePdfRequest {
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub quiz: Option<String>,
}
