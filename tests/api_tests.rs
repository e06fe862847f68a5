use std::sync::Arc;

use studio_portal::{
    AppState,
    auth::{IdentityState, MockIdentityProvider},
    config::AppConfig,
    create_router,
    models::{
        ClientLoginResponse, ClientSessionResponse, GateStatusResponse, LoginResponse, MeResponse,
        Profile, ResourceView, Role, SessionResponse,
    },
    session::{InMemorySessionStore, SessionState},
};
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

async fn spawn_app(identity: MockIdentityProvider) -> TestApp {
    let state = AppState {
        sessions: Arc::new(InMemorySessionStore::new()) as SessionState,
        identity: Arc::new(identity) as IdentityState,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

async fn start_session(client: &reqwest::Client, address: &str) -> SessionResponse {
    client
        .post(format!("{}/session", address))
        .send()
        .await
        .expect("session req fail")
        .json()
        .await
        .expect("session body")
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(MockIdentityProvider::default()).await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_client_login_end_to_end() {
    let app = spawn_app(MockIdentityProvider::default()).await;
    let client = reqwest::Client::new();
    let session = start_session(&client, &app.address).await;

    // Lowercase code + correct password: authenticated, configured redirect returned.
    let response = client
        .post(format!("{}/clients/login", app.address))
        .bearer_auth(&session.token)
        .json(&serde_json::json!({ "code": "a1", "password": "halloffame" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let login: ClientLoginResponse = response.json().await.unwrap();
    assert_eq!(login.redirect, "/clients/athletes-first/pitch-deck");

    // The session now carries the client identity.
    let response = client
        .get(format!("{}/clients/session", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let identity: ClientSessionResponse = response.json().await.unwrap();
    assert_eq!(identity.code, "A1");

    // Wrong password: the one generic message, no redirect.
    let response = client
        .post(format!("{}/clients/login", app.address))
        .bearer_auth(&session.token)
        .json(&serde_json::json!({ "code": "a1", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_client_logout_clears_identity_only() {
    let app = spawn_app(MockIdentityProvider::default()).await;
    let client = reqwest::Client::new();
    let session = start_session(&client, &app.address).await;

    let response = client
        .post(format!("{}/clients/login", app.address))
        .bearer_auth(&session.token)
        .json(&serde_json::json!({ "code": "z0", "password": "firstlight" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/clients/logout", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    // Identity gone, but the session itself survives.
    let response = client
        .get(format!("{}/clients/session", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_gate_unlock_end_to_end() {
    let app = spawn_app(MockIdentityProvider::default()).await;
    let client = reqwest::Client::new();
    let session = start_session(&client, &app.address).await;

    // Mount-time check: locked, and the content route releases nothing.
    let response = client
        .get(format!("{}/gate/work-canvas", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    let status: GateStatusResponse = response.json().await.unwrap();
    assert!(!status.unlocked);

    let response = client
        .get(format!("{}/content/work-canvas", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // Unlock with the exact secret.
    let response = client
        .post(format!("{}/gate/unlock", app.address))
        .bearer_auth(&session.token)
        .json(&serde_json::json!({ "storage_key": "work-canvas", "password": "process2025" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Subsequent requests in the same session skip the challenge.
    let response = client
        .get(format!("{}/content/work-canvas", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let view: ResourceView = response.json().await.unwrap();
    assert_eq!(view.storage_key, "work-canvas");

    // A different session still faces the gate.
    let other = start_session(&client, &app.address).await;
    let response = client
        .get(format!("{}/content/work-canvas", app.address))
        .bearer_auth(&other.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_role_login_lands_on_dashboard() {
    let profile = Profile {
        id: Uuid::new_v4(),
        email: "founder@studio.example".to_string(),
        role: Role::Owner,
    };
    let app = spawn_app(MockIdentityProvider::with_profile(profile)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/login", app.address))
        .json(&serde_json::json!({ "email": "founder@studio.example", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let login: LoginResponse = response.json().await.unwrap();
    assert_eq!(login.role, Role::Owner);
    assert_eq!(login.redirect, "/owner");

    let response = client
        .get(format!("{}/me", app.address))
        .bearer_auth(&login.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let me: MeResponse = response.json().await.unwrap();
    assert_eq!(me.role, Role::Owner);
    assert_eq!(me.dashboard, "/owner");
}

#[tokio::test]
async fn test_role_login_failure_message_verbatim() {
    let app = spawn_app(MockIdentityProvider::failing("Invalid login credentials")).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/login", app.address))
        .json(&serde_json::json!({ "email": "x@y.example", "password": "bad" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid login credentials");
}

#[tokio::test]
async fn test_me_rejects_visitor_sessions() {
    let app = spawn_app(MockIdentityProvider::default()).await;
    let client = reqwest::Client::new();
    let session = start_session(&client, &app.address).await;

    let response = client
        .get(format!("{}/me", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let app = spawn_app(MockIdentityProvider::default()).await;
    let client = reqwest::Client::new();
    let session = start_session(&client, &app.address).await;

    let response = client
        .post(format!("{}/logout", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    // The token is now a reference to nothing.
    let response = client
        .get(format!("{}/gate/work-canvas", app.address))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}
