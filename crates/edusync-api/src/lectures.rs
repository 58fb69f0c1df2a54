use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use edusync_db::NewLecture;
use edusync_types::api::{LecturesResponse, SaveLectureRequest, SaveLectureResponse};

use crate::error::ApiError;
use crate::middleware::CurrentSession;
use crate::state::{AppState, with_db};

/// POST /save_lecture
///
/// `user_id` comes from the body; when the body omits it the session's user
/// is used instead.
pub async fn save_lecture(
    State(state): State<AppState>,
    session: CurrentSession,
    WithRejection(Json(req), _): WithRejection<Json<SaveLectureRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let missing = || ApiError::BadRequest("Missing user_id or transcript".into());

    let user_id = match &req.user_id {
        Some(raw) => raw.resolve().ok_or_else(missing)?,
        None => session.0.as_ref().map(|s| s.user_id).ok_or_else(missing)?,
    };
    session.authorize(user_id)?;

    let transcript = req
        .transcript
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(missing)?;

    let lecture = NewLecture {
        user_id,
        title: req.title,
        transcript,
        summary: req.summary,
        quiz: req.quiz,
    };
    let lecture_id = with_db(&state, move |db| db.insert_lecture(&lecture)).await?;

    info!("Saved lecture {} for user {}", lecture_id, user_id);
    Ok((
        StatusCode::CREATED,
        Json(SaveLectureResponse {
            message: "Lecture saved successfully".into(),
            lecture_id,
        }),
    ))
}

/// GET /lectures/{user_id}, newest first.
pub async fn list_lectures(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<i64>, ApiError>,
    session: CurrentSession,
) -> Result<Json<LecturesResponse>, ApiError> {
    session.authorize(user_id)?;

    let rows = with_db(&state, move |db| db.list_lectures(user_id)).await?;

    Ok(Json(LecturesResponse {
        lectures: rows.into_iter().map(|row| row.into_lecture()).collect(),
    }))
}
