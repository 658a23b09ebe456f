//! Account and session flow tests
//!
//! The application runs on in-memory stores, so every test starts from
//! an empty state and talks to the real HTTP surface.

use std::net::TcpListener;

use serde_json::{json, Value};

use bulletin::configuration::{ApplicationSettings, AuthSettings, PaymentSettings};
use bulletin::startup::run;
use bulletin::store::Stores;

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let application = ApplicationSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        env: "dev".to_string(),
    };
    let auth = AuthSettings {
        secret: "integration-test-secret".to_string(),
        access_token_ttl_seconds: 3600,
        refresh_token_ttl_days: 60,
    };
    let payment = PaymentSettings {
        api_key: "test-payment-key".to_string(),
    };

    let server = run(listener, Stores::in_memory(), application, auth, payment)
        .expect("Failed to create server");

    let _ = tokio::spawn(async move {
        let _ = server.await;
    });

    format!("http://127.0.0.1:{}", port)
}

async fn register(
    client: &reqwest::Client,
    addr: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/users", addr))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to execute request.")
}

async fn login(
    client: &reqwest::Client,
    addr: &str,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/login", addr))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to execute request.")
}

// --- Account Creation Tests ---

#[tokio::test]
async fn create_user_returns_201_with_the_account_body() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    let response = register(&client, &addr, "dana@example.com", "hunter2plus").await;

    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "dana@example.com");
    assert_eq!(body["is_premium"], false);
    assert!(body.get("id").is_some());
    assert!(body.get("created_at").is_some());
    assert!(body.get("updated_at").is_some());

    // Neither the hash nor any token belongs in this response.
    assert!(body.get("password_hash").is_none());
    assert!(body.get("token").is_none());
    assert!(body.get("refresh_token").is_none());
}

#[tokio::test]
async fn create_user_rejects_invalid_emails() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    let invalid_emails = vec!["notanemail", "user@", "@example.com", "user@@example.com"];

    for invalid_email in invalid_emails {
        let response = register(&client, &addr, invalid_email, "hunter2plus").await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "Should reject invalid email: {}",
            invalid_email
        );
    }
}

#[tokio::test]
async fn create_user_rejects_duplicate_emails() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    let first = register(&client, &addr, "dana@example.com", "hunter2plus").await;
    assert_eq!(201, first.status().as_u16());

    let second = register(&client, &addr, "dana@example.com", "other-password").await;
    assert_eq!(409, second.status().as_u16());

    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "DUPLICATE_ENTRY");
}

// --- Login Tests ---

#[tokio::test]
async fn login_returns_the_account_with_both_tokens() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    let created: Value = register(&client, &addr, "dana@example.com", "hunter2plus")
        .await
        .json()
        .await
        .expect("Failed to parse response");

    let response = login(&client, &addr, "dana@example.com", "hunter2plus").await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["email"], "dana@example.com");
    assert!(body["token"].as_str().map_or(false, |t| !t.is_empty()));
    assert!(body["refresh_token"]
        .as_str()
        .map_or(false, |t| t.len() == 64));
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn login_failures_share_one_response() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    register(&client, &addr, "dana@example.com", "hunter2plus").await;

    let unknown_email = login(&client, &addr, "ghost@example.com", "hunter2plus").await;
    let unknown_status = unknown_email.status().as_u16();
    let unknown_body: Value = unknown_email.json().await.expect("Failed to parse response");

    let wrong_password = login(&client, &addr, "dana@example.com", "not-the-password").await;
    let wrong_status = wrong_password.status().as_u16();
    let wrong_body: Value = wrong_password.json().await.expect("Failed to parse response");

    assert_eq!(401, unknown_status);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(unknown_body["message"], wrong_body["message"]);
    assert_eq!(unknown_body["code"], wrong_body["code"]);
    assert_eq!(unknown_body["message"], "Invalid email or password");
    assert_eq!(unknown_body["code"], "INVALID_CREDENTIALS");
}

// --- Refresh Tests ---

#[tokio::test]
async fn refresh_returns_a_fresh_access_token() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    register(&client, &addr, "dana@example.com", "hunter2plus").await;
    let session: Value = login(&client, &addr, "dana@example.com", "hunter2plus")
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let refresh_token = session["refresh_token"].as_str().unwrap();

    let response = client
        .post(&format!("{}/api/refresh", addr))
        .header("Authorization", format!("Bearer {}", refresh_token))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].as_str().map_or(false, |t| !t.is_empty()));

    // The same refresh token keeps working; it is not rotated.
    let again = client
        .post(&format!("{}/api/refresh", addr))
        .header("Authorization", format!("Bearer {}", refresh_token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, again.status().as_u16());
}

#[tokio::test]
async fn refresh_rejects_bad_authorization_headers() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    // (header value, reason); None means the header is absent entirely.
    let cases: Vec<(Option<&str>, &str)> = vec![
        (None, "missing header"),
        (Some("Bearer"), "scheme without token"),
        (Some("Basic dXNlcjpwYXNz"), "wrong scheme"),
        (Some("bearer sometoken"), "lowercase scheme"),
    ];

    for (header, reason) in cases {
        let mut request = client.post(&format!("{}/api/refresh", addr));
        if let Some(value) = header {
            request = request.header("Authorization", value);
        }
        let response = request.send().await.expect("Failed to execute request.");

        assert_eq!(
            401,
            response.status().as_u16(),
            "Should reject refresh with {}",
            reason
        );
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["message"], "Invalid credentials", "case: {}", reason);
    }
}

#[tokio::test]
async fn refresh_rejects_tokens_that_were_never_issued() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/refresh", addr))
        .header("Authorization", format!("Bearer {}", "ab".repeat(32)))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
}

// --- Revocation Tests ---

#[tokio::test]
async fn revoke_closes_the_session() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    register(&client, &addr, "dana@example.com", "hunter2plus").await;
    let session: Value = login(&client, &addr, "dana@example.com", "hunter2plus")
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let refresh_token = session["refresh_token"].as_str().unwrap();

    let revoke = client
        .post(&format!("{}/api/revoke", addr))
        .header("Authorization", format!("Bearer {}", refresh_token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(204, revoke.status().as_u16());

    let refresh = client
        .post(&format!("{}/api/refresh", addr))
        .header("Authorization", format!("Bearer {}", refresh_token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, refresh.status().as_u16());

    // Revoking the same session again still succeeds.
    let revoke_again = client
        .post(&format!("{}/api/revoke", addr))
        .header("Authorization", format!("Bearer {}", refresh_token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(204, revoke_again.status().as_u16());
}

#[tokio::test]
async fn revoke_rejects_tokens_that_were_never_issued() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/revoke", addr))
        .header("Authorization", format!("Bearer {}", "cd".repeat(32)))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
}
