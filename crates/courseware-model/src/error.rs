use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid quiz id: {0:?}")]
    InvalidQuizId(String),
    #[error("invalid question id: {0:?}")]
    InvalidQuestionId(String),
    #[error("invalid answer id: {0:?}")]
    InvalidAnswerId(String),
    #[error("invalid block id: {0:?}")]
    InvalidBlockId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
