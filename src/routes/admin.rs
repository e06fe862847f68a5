use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to sessions with the Owner role:
/// the page-inventory audit and its destructive companions.
///
/// Access Control:
/// Requests reaching these handlers must first authenticate (the `AuthUser`
/// extractor), and each handler then explicitly checks for the Owner role
/// before proceeding. The inventory report itself is advisory — the
/// `is_protected` flag is a path-convention heuristic, while real enforcement
/// lives in the gate components on the public router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/pages
        // Runs the route-tree scan: every page with its category, protection flag,
        // and duplicate annotation. Regenerated on each call; nothing is persisted.
        .route(
            "/pages",
            get(handlers::list_pages).delete(handlers::delete_page),
        )
        // POST /admin/pages/archive
        // Soft delete: moves the page file under the archive tree and appends an
        // audit line. DELETE /admin/pages above removes the file permanently.
        .route("/pages/archive", post(handlers::archive_page))
}
