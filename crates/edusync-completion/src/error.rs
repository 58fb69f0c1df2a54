use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request timed out")]
    Timeout,

    #[error("completion API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("completion API unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("completion API returned no content")]
    EmptyResponse,
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}
