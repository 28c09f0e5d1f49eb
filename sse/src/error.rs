//! Error types for broker operations.

use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The broker has been drained and no longer accepts subscriptions.
    ShuttingDown,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShuttingDown => write!(f, "Broker is shutting down"),
        }
    }
}

impl std::error::Error for Error {}
