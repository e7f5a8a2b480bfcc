//! Response mapping.
//!
//! # Responsibilities
//! - Map dispatch results to the literal status + short text body contract
//!
//! # Design Decisions
//! - Success body is "OK" immediately followed by the command's stdout
//! - Rejections never echo request data or command output
//! - Deploy failures share 404 with unknown targets

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::deploy::DeployOutcome;
use crate::dispatch::DispatchError;

pub const OK_BODY: &str = "OK";
pub const UNAUTHORIZED_BODY: &str = "Unauthorized";
pub const NOT_FOUND_BODY: &str = "Not Found";

/// A completed deployment.
#[derive(Debug)]
pub struct Deployed(pub DeployOutcome);

impl IntoResponse for Deployed {
    fn into_response(self) -> Response {
        (StatusCode::OK, format!("{}{}", OK_BODY, self.0.output)).into_response()
    }
}

pub fn status_for(error: &DispatchError) -> StatusCode {
    match error {
        DispatchError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        DispatchError::NotFound { .. } | DispatchError::DeployFailed { .. } => StatusCode::NOT_FOUND,
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = if status == StatusCode::FORBIDDEN {
            UNAUTHORIZED_BODY
        } else {
            NOT_FOUND_BODY
        };
        (status, body).into_response()
    }
}
