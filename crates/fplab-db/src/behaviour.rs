//! Database operations for the `users` table: one behaviour counter per
//! canvas hash.

use sqlx::SqlitePool;

use crate::DbError;

/// Returns the stored behaviour for `id`, or `None` if no row exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_behaviour(pool: &SqlitePool, id: &str) -> Result<Option<i64>, DbError> {
    let behaviour = sqlx::query_scalar::<_, i64>("SELECT behaviour FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(behaviour)
}

/// Inserts or replaces the behaviour for `id`. Last write wins.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_behaviour(pool: &SqlitePool, id: &str, behaviour: i64) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO users (id, behaviour) VALUES (?, ?) \
         ON CONFLICT(id) DO UPDATE SET behaviour = excluded.behaviour",
    )
    .bind(id)
    .bind(behaviour)
    .execute(pool)
    .await?;

    Ok(())
}

/// Number of rows in `users`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_behaviours(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
