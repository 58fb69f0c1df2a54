use std::sync::Arc;

use edusync_completion::CompletionClient;
use edusync_db::Database;
use tracing::error;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub completion: Arc<dyn CompletionClient>,
    pub jwt_secret: String,
}

impl AppStateInner {
    pub fn new(db: Database, completion: Arc<dyn CompletionClient>, jwt_secret: String) -> AppState {
        Arc::new(Self {
            db,
            completion,
            jwt_secret,
        })
    }
}

/// Run a blocking DB call off the async runtime.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> edusync_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal("blocking task failed".into())
        })?
        .map_err(ApiError::from)
}
