/*
 * Responsibility
 * - Posts の request/response DTO
 * - created_by はリクエストからは受け取らず、認証済みユーザー名を使う
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::post_repo::PostRow;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_title_and_content(&self.title, &self.content)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_title_and_content(&self.title, &self.content)
    }
}

fn validate_title_and_content(title: &str, content: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title is required");
    }
    if title.chars().count() > 255 {
        return Err("title must be <= 255 chars");
    }
    if content.trim().is_empty() {
        return Err("content is required");
    }

    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date_created: DateTime<Utc>,
    pub created_by: String,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            date_created: row.date_created,
            created_by: row.created_by,
        }
    }
}
