use log::debug;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewUser, User, UserUpdate},
    traits::AuthApiError,
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, AuthApiError> {
    let result = sqlx::query_as::<_, User>(
        r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.role.to_string())
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => {
            debug!("🗃️ User [{}] inserted with id {}", user.email, user.id);
            Ok(user)
        },
        Err(e) if is_unique_violation(&e) => Err(AuthApiError::EmailTaken),
        Err(e) => Err(e.into()),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error().map(|db| db.is_unique_violation()).unwrap_or(false)
}

pub async fn fetch_user_by_id(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await
}

/// Email lookup is case-insensitive: `Alice@Example.com` and `alice@example.com` are the same
/// account.
pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE LOWER(email) = LOWER($1)").bind(email).fetch_optional(conn).await
}

pub async fn update_user(
    user_id: i64,
    update: UserUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, AuthApiError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for user {user_id}. Update request skipped.");
        return fetch_user_by_id(user_id, conn).await.map_err(Into::into);
    }
    let mut builder = QueryBuilder::new("UPDATE users SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(email) = update.email {
        set_clause.push("email = ");
        set_clause.push_bind_unseparated(email);
    }
    if let Some(password_hash) = update.password_hash {
        set_clause.push("password_hash = ");
        set_clause.push_bind_unseparated(password_hash);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(user_id);
    builder.push(" RETURNING *");
    let result = builder.build_query_as::<User>().fetch_optional(conn).await;
    match result {
        Ok(user) => Ok(user),
        Err(e) if is_unique_violation(&e) => Err(AuthApiError::EmailTaken),
        Err(e) => Err(e.into()),
    }
}

/// The number of customer accounts. Staff accounts are excluded.
pub async fn count_customers(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'user'").fetch_one(conn).await?;
    Ok(count)
}
