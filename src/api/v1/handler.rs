use super::error::GatewayError;
use crate::application_port::{
    AuthError, ClaimsResolver, IdentityValidator, IssuedTokens, SessionService,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Value,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: Value,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn login_error(error: AuthError) -> GatewayError {
    match error {
        AuthError::ValidationFailed(reason) => GatewayError::LoginFailed(reason),
        other => GatewayError::from_token_error(other),
    }
}

fn register_error(error: AuthError) -> GatewayError {
    match error {
        AuthError::ValidationFailed(reason) => GatewayError::RegistrationFailed(reason),
        other => GatewayError::from_token_error(other),
    }
}

async fn establish_session(
    body: Value,
    session_service: Arc<dyn SessionService>,
    validator: Arc<dyn IdentityValidator>,
) -> Result<(Value, IssuedTokens), AuthError> {
    let user = validator.validate(&body).await?;
    let tokens = session_service.issue(&user).await?;
    Ok((user, tokens))
}

pub async fn login(
    body: Value,
    session_service: Arc<dyn SessionService>,
    validator: Arc<dyn IdentityValidator>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (user, tokens) = establish_session(body, session_service, validator)
        .await
        .map_err(|e| reject::custom(login_error(e)))?;

    let response = SessionResponse {
        user,
        access_token: tokens.access_token.0,
        refresh_token: tokens.refresh_token.0,
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::CREATED,
    ))
}

pub async fn register(
    body: Value,
    session_service: Arc<dyn SessionService>,
    validator: Arc<dyn IdentityValidator>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (user, tokens) = establish_session(body, session_service, validator)
        .await
        .map_err(|e| reject::custom(register_error(e)))?;

    let response = SessionResponse {
        user,
        access_token: tokens.access_token.0,
        refresh_token: tokens.refresh_token.0,
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::CREATED,
    ))
}

pub async fn get_user(
    token: String,
    session_service: Arc<dyn SessionService>,
    resolver: Arc<dyn ClaimsResolver>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let claims = session_service
        .validate_access(&token)
        .await
        .map_err(GatewayError::from_token_error)
        .map_err(reject::custom)?;

    let user = resolver
        .resolve(&claims)
        .await
        .map_err(GatewayError::from_token_error)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&UserResponse { user }))
}

pub async fn refresh(
    token: String,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tokens = session_service
        .rotate_refresh(&token)
        .await
        .map_err(GatewayError::from_token_error)
        .map_err(reject::custom)?;

    let response = TokenPairResponse {
        access_token: tokens.access_token.0,
        refresh_token: tokens.refresh_token.0,
    };
    Ok(warp::reply::json(&response))
}

pub async fn logout(
    token: String,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    session_service
        .revoke(&token)
        .await
        .map_err(GatewayError::from_token_error)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&MessageResponse {
        message: "Logged Out".to_string(),
    }))
}
