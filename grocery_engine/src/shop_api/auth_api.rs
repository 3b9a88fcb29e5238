use std::fmt::Debug;

use bcrypt::DEFAULT_COST;
use log::*;

use crate::{
    db_types::{NewUser, Role, User, UserUpdate},
    traits::{AuthApiError, UserManagement},
};

/// `AuthApi` manages user accounts and credentials. It owns password hashing; storage backends only
/// ever see bcrypt hashes.
pub struct AuthApi<B> {
    db: B,
}

impl<B> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi")
    }
}

impl<B> AuthApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AuthApi<B>
where B: UserManagement
{
    /// Registers a new customer account. The email must not already be in use (checked
    /// case-insensitively by the backend).
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthApiError> {
        let password_hash = hash_password(password)?;
        let user = NewUser {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            role: Role::User,
        };
        let user = self.db.create_user(user).await?;
        info!("🔐️ Registered new account #{} for {}", user.id, user.email);
        Ok(user)
    }

    /// Verifies a login attempt. Both an unknown email and a wrong password produce the same
    /// `InvalidCredentials` error, so a caller cannot probe which addresses have accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthApiError> {
        let user = match self.db.fetch_user_by_email(email.trim()).await? {
            Some(user) => user,
            None => {
                debug!("🔐️ Login attempt for unknown email");
                return Err(AuthApiError::InvalidCredentials);
            },
        };
        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AuthApiError::HashingError(e.to_string()))?;
        if !valid {
            debug!("🔐️ Login attempt with wrong password for account #{}", user.id);
            return Err(AuthApiError::InvalidCredentials);
        }
        debug!("🔐️ Login successful for account #{}", user.id);
        Ok(user)
    }

    pub async fn profile(&self, user_id: i64) -> Result<User, AuthApiError> {
        self.db.fetch_user(user_id).await?.ok_or(AuthApiError::UserNotFound)
    }

    /// Updates name, email and/or password for the account. A new password is hashed here; the
    /// other fields pass through unchanged.
    pub async fn update_profile(
        &self,
        user_id: i64,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<User, AuthApiError> {
        let password_hash = password.as_deref().map(hash_password).transpose()?;
        let update = UserUpdate { name, email, password_hash };
        if update.is_empty() {
            return self.profile(user_id).await;
        }
        let user = self.db.update_user(user_id, update).await?;
        debug!("🔐️ Profile updated for account #{user_id}");
        Ok(user)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

fn hash_password(password: &str) -> Result<String, AuthApiError> {
    bcrypt::hash(password, DEFAULT_COST).map_err(|e| AuthApiError::HashingError(e.to_string()))
}
