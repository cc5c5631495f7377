//! Unified error types for the expense tracker core.
//!
//! Business-rule violations are raised as typed variants at the point of detection and
//! propagate unchanged to the boundary, which translates them with [`Error::status_code`].

use sea_orm::DbErr;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced entity does not exist (or is soft-deleted)
    #[error("{entity} not found: {message}")]
    NotFound {
        /// Entity kind, e.g. `"User"`
        entity: &'static str,
        /// Human-readable detail
        message: String,
    },

    /// A uniqueness rule was violated before insert
    #[error("{entity} already exists: {message}")]
    AlreadyExists {
        /// Entity kind
        entity: &'static str,
        /// Human-readable detail
        message: String,
    },

    /// Authentication failed or the caller does not own the entity
    #[error("Not authorized ({entity}): {message}")]
    NotAuthorized {
        /// Entity kind
        entity: &'static str,
        /// Human-readable detail
        message: String,
    },

    /// The caller is authenticated but its role does not allow the operation
    #[error("Forbidden ({entity}): {message}")]
    Forbidden {
        /// Entity kind
        entity: &'static str,
        /// Human-readable detail
        message: String,
    },

    /// Malformed input caught by service-level validation
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Human-readable detail
        message: String,
    },

    /// Unexpected state, e.g. a row vanishing between check and delete
    #[error("Server error: {message}")]
    ServerError {
        /// Human-readable detail
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable detail
        message: String,
    },

    /// Error reported by the relational store
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Password hashing or hash parsing failed
    #[error("Password hash error: {message}")]
    PasswordHash {
        /// Human-readable detail
        message: String,
    },

    /// Token encoding failed
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    /// Builds a [`Error::NotFound`] for `entity`.
    pub fn not_found(entity: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            message: message.into(),
        }
    }

    /// Builds a [`Error::AlreadyExists`] for `entity`.
    pub fn already_exists(entity: &'static str, message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            message: message.into(),
        }
    }

    /// Builds a [`Error::NotAuthorized`] for `entity`.
    pub fn not_authorized(entity: &'static str, message: impl Into<String>) -> Self {
        Self::NotAuthorized {
            entity,
            message: message.into(),
        }
    }

    /// Builds a [`Error::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// HTTP-equivalent status code used by the boundary layer.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::AlreadyExists { .. } => 409,
            Self::NotAuthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::InvalidArgument { .. } => 400,
            Self::ServerError { .. }
            | Self::Config { .. }
            | Self::Database(_)
            | Self::PasswordHash { .. }
            | Self::Token(_) => 500,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
