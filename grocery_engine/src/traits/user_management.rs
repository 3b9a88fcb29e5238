use thiserror::Error;

use crate::db_types::{NewUser, User, UserUpdate};

/// User account storage. Password hashing happens in [`crate::AuthApi`]; this trait only ever sees
/// bcrypt hashes.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Inserts a new account. Fails with [`AuthApiError::EmailTaken`] if an account already exists
    /// for the email (compared case-insensitively).
    async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError>;

    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, AuthApiError>;

    /// Looks up an account by email, case-insensitively.
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError>;

    /// Applies the non-`None` fields of `update` to the account and returns the updated record.
    async fn update_user(&self, user_id: i64, update: UserUpdate) -> Result<User, AuthApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User already exists")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Could not process the password. {0}")]
    HashingError(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}
