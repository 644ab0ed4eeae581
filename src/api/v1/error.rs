use crate::application_port::AuthError;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Rejection, reject};

/// Flat boundary error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub err: String,
}

impl ErrorBody {
    fn uniform(text: &str) -> Self {
        ErrorBody {
            message: text.to_string(),
            err: text.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum GatewayError {
    InvalidToken,
    BadSession,
    LoginFailed(String),
    RegistrationFailed(String),
    Unavailable,
    Internal,
}

impl reject::Reject for GatewayError {}

impl GatewayError {
    /// Collapse every token-verification failure into one boundary error so
    /// the response never discloses which check rejected the credential.
    /// Dead sessions and server-side faults stay distinct.
    pub fn from_token_error(error: AuthError) -> GatewayError {
        match error {
            AuthError::SessionNotFound => GatewayError::BadSession,
            AuthError::Unavailable(e) => {
                warn!("credential store unavailable: {}", e);
                GatewayError::Unavailable
            }
            AuthError::Internal(e) => {
                warn!("internal auth failure: {}", e);
                GatewayError::Internal
            }
            other => {
                debug!("token rejected: {}", other);
                GatewayError::InvalidToken
            }
        }
    }

    fn render(&self) -> (StatusCode, ErrorBody) {
        match self {
            GatewayError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, ErrorBody::uniform("Invalid Token"))
            }
            GatewayError::BadSession => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::uniform("Bad Session Request"),
            ),
            GatewayError::LoginFailed(err) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message: "Login Failed".to_string(),
                    err: err.clone(),
                },
            ),
            // "Registeration" is the wire contract, not a typo to fix.
            GatewayError::RegistrationFailed(err) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message: "Registeration Failed".to_string(),
                    err: err.clone(),
                },
            ),
            GatewayError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody::uniform("Service Unavailable"),
            ),
            GatewayError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::uniform("Internal Server Error"),
            ),
        }
    }
}

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(gateway_error) = err.find::<GatewayError>() {
        let (status, body) = gateway_error.render();
        Ok(warp::reply::with_status(warp::reply::json(&body), status))
    } else if err.is_not_found() {
        Ok(warp::reply::with_status(
            warp::reply::json(&ErrorBody::uniform("Not Found")),
            StatusCode::NOT_FOUND,
        ))
    } else {
        Ok(warp::reply::with_status(
            warp::reply::json(&ErrorBody::uniform("Bad Request")),
            StatusCode::BAD_REQUEST,
        ))
    }
}
