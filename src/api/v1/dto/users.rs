/*
 * Responsibility
 * - Users (register / login / me) の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 * - password_hash はレスポンスに含めない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::user_repo::UserRow;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let len = self.username.trim().chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            return Err("username must be 3-50 characters");
        }
        if !looks_like_email(&self.email) {
            return Err("email is invalid");
        }
        if self.password.chars().count() < PASSWORD_MIN {
            return Err("password must be at least 8 characters");
        }

        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("username is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub date_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            date_created: row.date_created,
            last_login: row.last_login,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}
