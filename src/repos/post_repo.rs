/*
 * Responsibility
 * - posts CRUD
 * - created_by には投稿者の username を保存する
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date_created: DateTime<Utc>,
    pub created_by: String,
}

pub async fn list(pool: &PgPool) -> Result<Vec<PostRow>, RepoError> {
    let rows = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, title, content, date_created, created_by
        FROM posts
        ORDER BY date_created DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn create(
    pool: &PgPool,
    title: &str,
    content: &str,
    created_by: &str,
) -> Result<PostRow, RepoError> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        INSERT INTO posts (title, content, created_by)
        VALUES ($1, $2, $3)
        RETURNING id, title, content, date_created, created_by
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(created_by)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get(pool: &PgPool, post_id: i64) -> Result<Option<PostRow>, RepoError> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, title, content, date_created, created_by
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    post_id: i64,
    title: &str,
    content: &str,
) -> Result<Option<PostRow>, RepoError> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        UPDATE posts
        SET title = $2, content = $3
        WHERE id = $1
        RETURNING id, title, content, date_created, created_by
        "#,
    )
    .bind(post_id)
    .bind(title)
    .bind(content)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, post_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
