use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use tracing::info;

use edusync_completion::prompts;
use edusync_types::api::{QuizResponse, SummaryResponse, TranscriptRequest};

use crate::error::ApiError;
use crate::state::AppState;

fn transcript_of(req: TranscriptRequest) -> Result<String, ApiError> {
    req.transcript
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Transcript required".into()))
}

/// POST /summarize
pub async fn summarize(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<TranscriptRequest>, ApiError>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let transcript = transcript_of(req)?;

    let summary = prompts::summarize(state.completion.as_ref(), &transcript).await?;

    info!(
        "Summarized transcript ({} chars -> {} chars)",
        transcript.len(),
        summary.len()
    );
    Ok(Json(SummaryResponse { summary }))
}

/// POST /quiz
pub async fn quiz(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<TranscriptRequest>, ApiError>,
) -> Result<Json<QuizResponse>, ApiError> {
    let transcript = transcript_of(req)?;

    let quiz = prompts::generate_quiz(state.completion.as_ref(), &transcript).await?;

    info!("Generated quiz for transcript ({} chars)", transcript.len());
    Ok(Json(QuizResponse { quiz }))
}
