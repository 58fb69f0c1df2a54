pub mod auth;
pub mod completions;
pub mod error;
pub mod lectures;
pub mod middleware;
pub mod pdf;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, AppStateInner};
