use super::error::GatewayError;
use super::extract::TokenExtractor;
use super::handler;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::{Filter, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let login = warp::post()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.session_service.clone()))
        .and(with(server.login_validator.clone()))
        .and_then(handler::login);

    let register = warp::post()
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.session_service.clone()))
        .and(with(server.register_validator.clone()))
        .and_then(handler::register);

    let user = warp::get()
        .and(warp::path("user"))
        .and(warp::path::end())
        .and(with_token(server.extractor.clone()))
        .and(with(server.session_service.clone()))
        .and(with(server.claims_resolver.clone()))
        .and_then(handler::get_user);

    let refresh = warp::post()
        .and(warp::path("refresh"))
        .and(warp::path::end())
        .and(with_token(server.extractor.clone()))
        .and(with(server.session_service.clone()))
        .and_then(handler::refresh);

    let logout = warp::post()
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(with_token(server.extractor.clone()))
        .and(with(server.session_service.clone()))
        .and_then(handler::logout);

    login.or(register).or(user).or(refresh).or(logout)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Pull the raw credential string out of the request with the configured
/// extractor. A request it cannot locate a token in is rejected the same
/// way a bad token is.
fn with_token(
    extractor: Arc<dyn TokenExtractor>,
) -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    warp::header::headers_cloned().and_then(move |headers: HeaderMap| {
        let extractor = extractor.clone();
        async move {
            extractor
                .extract(&headers)
                .ok_or_else(|| reject::custom(GatewayError::InvalidToken))
        }
    })
}
