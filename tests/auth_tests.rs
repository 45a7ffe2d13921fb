use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hrms_client::config::ClientConfig;
use hrms_client::error::Error;
use hrms_client::Hrms;

async fn client(mock_server: &MockServer) -> Hrms {
    Hrms::new(ClientConfig::remote(&mock_server.uri()).unwrap()).unwrap()
}

#[tokio::test]
async fn login_returns_and_caches_the_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({
            "email": "admin@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc123"
        })))
        .mount(&mock_server)
        .await;

    let hrms = client(&mock_server).await;
    let session = hrms
        .auth()
        .login("admin@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(session.token, "abc123");
    assert_eq!(hrms.auth().get_session(), Some(session));
}

#[tokio::test]
async fn login_rejections_surface_the_servers_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials." })),
        )
        .mount(&mock_server)
        .await;

    let hrms = client(&mock_server).await;
    let err = hrms
        .auth()
        .login("admin@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RequestFailed(_)));
    assert_eq!(err.to_string(), "Invalid credentials.");
    assert!(hrms.auth().get_session().is_none());
}

#[tokio::test]
async fn login_falls_back_to_its_fixed_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock_server)
        .await;

    let hrms = client(&mock_server).await;
    let err = hrms
        .auth()
        .login("admin@example.com", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.to_string(), "Login failed.");
}

#[tokio::test]
async fn register_bootstraps_a_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .and(body_json(json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "fresh-token"
        })))
        .mount(&mock_server)
        .await;

    let hrms = client(&mock_server).await;
    let session = hrms
        .auth()
        .register("Ada Lovelace", "ada@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(session.token, "fresh-token");
    assert_eq!(hrms.auth().get_session(), Some(session));
}

#[tokio::test]
async fn register_failures_use_the_signup_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let hrms = client(&mock_server).await;
    let err = hrms
        .auth()
        .register("Ada", "ada@example.com", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RequestFailed(_)));
    assert_eq!(err.to_string(), "Signup failed.");
}

#[tokio::test]
async fn logout_revokes_and_clears_the_configured_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .and(header("Authorization", "Token seed-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::remote(&mock_server.uri())
        .unwrap()
        .with_auth_token("seed-token");
    let hrms = Hrms::new(config).unwrap();

    assert!(hrms.auth().get_session().is_some());
    hrms.auth().logout().await.unwrap();
    assert!(hrms.auth().get_session().is_none());
}

#[tokio::test]
async fn logout_revokes_the_token_obtained_by_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc123"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hrms = client(&mock_server).await;
    hrms.auth().login("admin@example.com", "secret").await.unwrap();
    hrms.auth().logout().await.unwrap();
    assert!(hrms.auth().get_session().is_none());
}

#[tokio::test]
async fn logout_without_a_session_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let hrms = client(&mock_server).await;
    hrms.auth().logout().await.unwrap();
}

#[tokio::test]
async fn logout_swallows_revocation_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::remote(&mock_server.uri())
        .unwrap()
        .with_auth_token("seed-token");
    let hrms = Hrms::new(config).unwrap();

    // The request fails server-side; the caller still ends up logged out.
    hrms.auth().logout().await.unwrap();
    assert!(hrms.auth().get_session().is_none());
}

#[tokio::test]
async fn slow_auth_calls_time_out_with_their_own_wording() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "late" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let config = ClientConfig::remote(&mock_server.uri())
        .unwrap()
        .with_auth_timeout(Duration::from_millis(50));
    let hrms = Hrms::new(config).unwrap();

    let err = hrms
        .auth()
        .login("admin@example.com", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
    assert_eq!(
        err.to_string(),
        "Request timed out. The server may be waking up—please try again."
    );
}
