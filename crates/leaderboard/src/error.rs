// In crates/leaderboard/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Leaderboard store query failed: {0}")]
    Store(#[from] store::Error),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}

pub type Result<T> = std::result::Result<T, Error>;
