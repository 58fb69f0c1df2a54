use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A saved transcript together with whatever summary and quiz the user
/// generated for it. The quiz is kept as the raw model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub transcript: String,
    pub summary: Option<String>,
    pub quiz: Option<String>,
    pub created_at: DateTime<Utc>,
}
