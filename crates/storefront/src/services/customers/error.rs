//! Customer service error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::password::HashError;

/// Errors that can occur during customer operations.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] cartline_core::EmailError),

    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The current password given for a password change is wrong.
    #[error("old password does not match")]
    WrongOldPassword,

    /// Customer not found.
    #[error("customer not found")]
    NotFound,

    /// Another customer already uses this email.
    #[error("email already registered")]
    EmailTaken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error(transparent)]
    PasswordHash(#[from] HashError),
}
