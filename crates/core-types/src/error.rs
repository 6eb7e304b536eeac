// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("user id must not be empty")]
    EmptyUserId,
}

pub type Result<T> = std::result::Result<T, Error>;
