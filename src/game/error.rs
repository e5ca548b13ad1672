//! Error type shared by construction, lookups, actions and persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid entity {name:?}: {reason}")]
    InvalidEntity { name: String, reason: String },

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("unknown requirement: {0}")]
    UnknownRequirement(String),

    #[error("{name} is not a {expected}")]
    WrongKind { name: String, expected: &'static str },

    #[error("{0} is still locked")]
    Locked(String),

    #[error("save data could not be parsed: {0}")]
    CorruptSave(#[from] serde_json::Error),

    #[error("save uses deprecated task name {0:?}")]
    DeprecatedSave(String),

    #[error("save version {version} is older than the minimum compatible version {min}")]
    IncompatibleSave { version: u32, min: u32 },
}

impl GameError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        GameError::InvalidEntity {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
