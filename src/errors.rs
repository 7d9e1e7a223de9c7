use thiserror::Error;

// Bring in the specific errors of each concern we want to wrap
use crate::ai::AiError;
use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::tree::TreeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization/Deserialization error (JSON): {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid mind map structure: {0}")]
    Tree(#[from] TreeError),

    #[error("AI idea generation failed: {0}")]
    Ai(#[from] AiError),

    #[error("Node with ID {0} not found")]
    NodeNotFound(String),

    #[error("Mind map with ID {0} not found")]
    MapNotFound(String),

    #[error("No mind map is selected")]
    NoCurrentMap,

    #[error("Invalid operation: Cannot delete the root node")]
    CannotDeleteRoot,

    #[error("An AI request is already in progress for node {0}")]
    AiBusy(String),
}

pub type AppResult<T> = Result<T, AppError>;
