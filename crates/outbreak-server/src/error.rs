//! Rejection type and the JSON error responses built from it.
//!
//! | Source | Status | Code |
//! |--------|--------|------|
//! | `SimError::NotConfigured` / `InvalidLocation` | 404 | engine code |
//! | `SimError::InvalidConfiguration` | 400 | `INVALID_CONFIGURATION` |
//! | `SimError::AlreadyExists` | 409 | `ALREADY_EXISTS` |
//! | failed config validation | 400 | `INVALID_CONFIGURATION` |
//! | malformed JSON body | 400 | `BAD_REQUEST` |
//! | unknown route | 404 | `NOT_FOUND` |
//!
//! Every body has the shape `{ "error", "code", "status_code" }`.

use std::convert::Infallible;

use outbreak_logic::{ConfigError, SimError};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

/// A failed API call, carried through warp as a custom rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub code: &'static str,
    pub status: StatusCode,
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            status,
        }
    }

    /// All validation problems joined into one message.
    pub fn invalid_config(errors: &[ConfigError]) -> Self {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(StatusCode::BAD_REQUEST, "INVALID_CONFIGURATION", message)
    }
}

impl From<SimError> for ApiError {
    fn from(err: SimError) -> Self {
        let status = match &err {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            SimError::AlreadyExists => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

/// Turn an engine error into a warp rejection.
pub fn reject(err: SimError) -> Rejection {
    warp::reject::custom(ApiError::from(err))
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let api = if let Some(api) = err.find::<ApiError>() {
        api.clone()
    } else if err.is_not_found() {
        ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Not Found")
    } else if let Some(body) = err.find::<warp::filters::body::BodyDeserializeError>() {
        ApiError::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", body.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ApiError::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "Method Not Allowed",
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            "Payload too large",
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        ApiError::new(
            StatusCode::LENGTH_REQUIRED,
            "LENGTH_REQUIRED",
            "Content-Length required",
        )
    } else {
        log::error!("unhandled rejection: {:?}", err);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "Internal Server Error",
        )
    };

    if api.status.is_server_error() {
        log::error!("{}: {}", api.code, api.message);
    } else {
        log::debug!("{}: {}", api.code, api.message);
    }

    let json = warp::reply::json(&serde_json::json!({
        "error": api.message,
        "code": api.code,
        "status_code": api.status.as_u16(),
    }));
    Ok(warp::reply::with_status(json, api.status))
}
