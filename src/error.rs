use thiserror::Error;

pub type TmdbResult<T> = std::result::Result<T, TmdbError>;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("JSON parse failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TmdbError {
    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        TmdbError::Status {
            endpoint: endpoint.into(),
            status,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::Status { status: 404, .. })
    }
}
