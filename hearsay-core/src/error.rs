//! Error types for the hearsay core library.

use thiserror::Error;

/// Top-level error type for core rumor operations.
#[derive(Error, Debug)]
pub enum HearsayError {
    /// A rumor with the given ID was not found.
    #[error("Rumor not found: {0}")]
    RumorNotFound(crate::RumorId),

    /// Entity not known to the engine.
    #[error("Entity not found: {0}")]
    EntityNotFound(crate::EntityId),

    /// An entity tried to retell a rumor it does not currently know.
    #[error("Entity {entity} does not know rumor {rumor}")]
    UnknownToTeller {
        /// The would-be teller.
        entity: crate::EntityId,
        /// The rumor in question.
        rumor: crate::RumorId,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, HearsayError>;
