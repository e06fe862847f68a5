use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Defines the routes accessible to any visitor who has completed a
/// role-authenticated sign-in against the identity provider.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware
/// being present on the router layer above it. This guarantees that all
/// handlers receive a validated `AuthUser` struct containing the session id and
/// resolved role, which downstream handlers use for RBAC checks.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // Retrieves the currently authenticated session's role and dashboard.
        .route("/me", get(handlers::get_me))
}
