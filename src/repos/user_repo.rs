/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - PgPool を受け取り登録 / 検索 / last_login 更新を提供
 * - password_hash は UserRow にのみ載せ、レスポンス DTO には出さない
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub date_created: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

pub async fn exists_by_username_or_email(
    db: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, RepoError> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users WHERE username = $1 OR email = $2
        )
        "#,
    )
    .bind(username)
    .bind(email)
    .fetch_one(db)
    .await?;

    Ok(exists)
}

pub async fn create(
    db: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<UserRow, RepoError> {
    // a concurrent registration can still win the race after the EXISTS check
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, username, email, password_hash, date_created, last_login
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, date_created, last_login
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn find_by_id(db: &PgPool, user_id: i64) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, date_created, last_login
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn touch_last_login(db: &PgPool, user_id: i64) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET last_login = NOW()
        WHERE id = $1
        RETURNING id, username, email, password_hash, date_created, last_login
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
