use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::middleware::attach_session;
use crate::state::AppState;
use crate::{auth, completions, lectures, pdf};

/// All JSON routes. Static assets, CORS and tracing layers are added by the
/// server binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/summarize", post(completions::summarize))
        .route("/quiz", post(completions::quiz))
        .route("/generate_pdf", post(pdf::generate_pdf))
        .route("/health", get(health))
        .with_state(state.clone());

    // Only the user-scoped routes look at the Authorization header.
    let session_routes = Router::new()
        .route("/save_lecture", post(lectures::save_lecture))
        .route("/lectures/{user_id}", get(lectures::list_lectures))
        .layer(middleware::from_fn_with_state(state.clone(), attach_session))
        .with_state(state);

    Router::new().merge(public_routes).merge(session_routes)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
