/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some(UNIQUE_VIOLATION)
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}
