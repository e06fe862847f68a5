use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints reachable without a role-authenticated session: the
/// session lifecycle, both login surfaces, and the password gate. Several of
/// these handlers still demand a live visitor session via the `ActiveSession`
/// extractor — "public" here means no role requirement, not no session.
///
/// Security Mandate:
/// Gated content (`/content/*`) must never be released before the session's
/// unlock flag for that resource has been checked. The check lives in the
/// handler, against the session credential store, on every request.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /session
        // Starts an anonymous visitor session and returns its bearer token. This is
        // the explicit session-start of the credential store lifecycle; gate unlocks
        // and the client identity attach to the session created here.
        .route("/session", post(handlers::create_session))
        // POST /login?redirect=...
        // Role-authenticated sign-in via the external identity provider. Returns the
        // session token plus the resolved redirect destination as a value.
        .route("/login", post(handlers::sign_in))
        // POST /logout
        // Destroys the caller's session and every credential it carried.
        .route("/logout", post(handlers::sign_out))
        // POST /clients/login
        // Client-portal login against the static credential directory. Writes the
        // active client identity into the caller's session on success.
        .route("/clients/login", post(handlers::client_sign_in))
        // GET /clients/session
        // Reads the active client identity; 401 sends the visitor to the client login.
        .route("/clients/session", get(handlers::client_session))
        // POST /clients/logout
        // Clears only the client identity, preserving the rest of the session.
        .route("/clients/logout", post(handlers::client_sign_out))
        // POST /gate/unlock
        // Submit side of the password gate: exact secret match flips the per-resource
        // unlock flag on the session.
        .route("/gate/unlock", post(handlers::unlock_resource))
        // GET /gate/{storage_key}
        // Side-effect-free unlock check, run before either branch is rendered.
        .route("/gate/{storage_key}", get(handlers::gate_status))
        // GET /content/{storage_key}
        // The gate-serving route: content descriptor when unlocked, challenge when locked.
        .route("/content/{storage_key}", get(handlers::get_protected_content))
}
