use gatehouse::api;
use gatehouse::api::v1::BearerHeaderExtractor;
use gatehouse::application_impl::{
    EchoClaimsResolver, FakeIdentityValidator, JwtConfig, JwtHs256Codec, RealSessionService,
    SubjectClaimsMapper,
};
use gatehouse::application_port::RevokePolicy;
use gatehouse::infra_memory::MemoryCredentialStore;
use gatehouse::server::Server;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use warp::Filter;
use warp::http::StatusCode;

fn test_server() -> Arc<Server> {
    let codec = JwtHs256Codec::new(JwtConfig {
        issuer: "api.gatehouse.test".to_string(),
        audience: vec!["gatehouse.test".to_string()],
        access_ttl: Duration::from_secs(900),
        refresh_ttl: Duration::from_secs(86400),
        access_secret: b"access-secret".to_vec(),
        refresh_secret: b"refresh-secret".to_vec(),
    });
    let session_service = RealSessionService::new(
        Arc::new(codec),
        Arc::new(MemoryCredentialStore::new(b"digest-key".to_vec())),
        Arc::new(SubjectClaimsMapper),
        RevokePolicy::Strict,
    );
    Arc::new(Server {
        session_service: Arc::new(session_service),
        login_validator: Arc::new(FakeIdentityValidator::new("Login failed")),
        register_validator: Arc::new(FakeIdentityValidator::new("Registration failed")),
        claims_resolver: Arc::new(EchoClaimsResolver),
        extractor: Arc::new(BearerHeaderExtractor),
    })
}

// Session state lives in the server, so every call may rebuild the filter
// from the same Arc.
fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    api::v1::routes(server).recover(api::v1::recover_error)
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body is json")
}

async fn login(server: &Arc<Server>) -> (String, String) {
    let res = warp::test::request()
        .method("POST")
        .path("/login")
        .json(&json!({"username": "ada", "password": "pw"}))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res.body());
    (
        body["accessToken"].as_str().unwrap().to_string(),
        body["refreshToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn login_issues_session() {
    let server = test_server();

    let res = warp::test::request()
        .method("POST")
        .path("/login")
        .json(&json!({"username": "ada", "password": "pw"}))
        .reply(&routes(server.clone()))
        .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res.body());
    assert_eq!(body["user"]["sub"], json!("ada"));
    assert!(body["accessToken"].is_string());
    assert!(body["refreshToken"].is_string());
}

#[tokio::test]
async fn login_rejection_names_the_route() {
    let server = test_server();

    let res = warp::test::request()
        .method("POST")
        .path("/login")
        .json(&json!({"username": "ada"}))
        .reply(&routes(server.clone()))
        .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res.body()),
        json!({"message": "Login Failed", "err": "Login failed"})
    );

    let res = warp::test::request()
        .method("POST")
        .path("/register")
        .json(&json!({}))
        .reply(&routes(server.clone()))
        .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res.body()),
        json!({"message": "Registeration Failed", "err": "Registration failed"})
    );
}

#[tokio::test]
async fn register_issues_session() {
    let server = test_server();

    let res = warp::test::request()
        .method("POST")
        .path("/register")
        .json(&json!({"username": "grace", "password": "pw"}))
        .reply(&routes(server.clone()))
        .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res.body());
    assert_eq!(body["user"]["sub"], json!("grace"));
    assert!(body["refreshToken"].is_string());
}

#[tokio::test]
async fn profile_route_requires_valid_access_token() {
    let server = test_server();
    let (access, _refresh) = login(&server).await;

    let res = warp::test::request()
        .method("GET")
        .path("/user")
        .header("authorization", format!("Bearer {}", access))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body())["user"]["sub"], json!("ada"));

    let res = warp::test::request()
        .method("GET")
        .path("/user")
        .header("authorization", "Bearer not-a-token")
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res.body()),
        json!({"message": "Invalid Token", "err": "Invalid Token"})
    );

    let res = warp::test::request()
        .method("GET")
        .path("/user")
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res.body()),
        json!({"message": "Invalid Token", "err": "Invalid Token"})
    );
}

#[tokio::test]
async fn refresh_rotates_and_consumes() {
    let server = test_server();
    let (access, refresh) = login(&server).await;

    let res = warp::test::request()
        .method("POST")
        .path("/refresh")
        .header("authorization", format!("Bearer {}", refresh))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    let new_access = body["accessToken"].as_str().unwrap().to_string();
    let new_refresh = body["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(new_access, access);
    assert_ne!(new_refresh, refresh);

    // The consumed refresh token is dead.
    let res = warp::test::request()
        .method("POST")
        .path("/refresh")
        .header("authorization", format!("Bearer {}", refresh))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res.body()),
        json!({"message": "Bad Session Request", "err": "Bad Session Request"})
    );

    // The replacement access token works.
    let res = warp::test::request()
        .method("GET")
        .path("/user")
        .header("authorization", format!("Bearer {}", new_access))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn access_token_is_not_a_refresh_token() {
    let server = test_server();
    let (access, _refresh) = login(&server).await;

    let res = warp::test::request()
        .method("POST")
        .path("/refresh")
        .header("authorization", format!("Bearer {}", access))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res.body()),
        json!({"message": "Invalid Token", "err": "Invalid Token"})
    );
}

#[tokio::test]
async fn logout_ends_the_session() {
    let server = test_server();
    let (_access, refresh) = login(&server).await;

    let res = warp::test::request()
        .method("POST")
        .path("/logout")
        .header("authorization", format!("Bearer {}", refresh))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body()), json!({"message": "Logged Out"}));

    // Second logout hits a dead session under the strict policy.
    let res = warp::test::request()
        .method("POST")
        .path("/logout")
        .header("authorization", format!("Bearer {}", refresh))
        .reply(&routes(server.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res.body()),
        json!({"message": "Bad Session Request", "err": "Bad Session Request"})
    );
}
