use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::*;

use sse::error::Error as BrokerError;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(BrokerError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.0)
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warn!("Request failed: {}", self.0);
        match self.0 {
            BrokerError::ShuttingDown => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE UNAVAILABLE").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<BrokerError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
