use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Track is locked: {0}")]
    LockedTrack(String),
    #[error("History error: {0}")]
    History(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<Box<dyn std::error::Error>> for EngineError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        EngineError::Runtime(err.to_string())
    }
}
