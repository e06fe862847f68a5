use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Access-Control Schemas ---

/// Role
///
/// The four-tier RBAC field resolved by the external identity provider.
/// Every authenticated principal carries exactly one role at a time, and each
/// role maps to exactly one default dashboard destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Owner,
    Team,
    Partner,
    Investor,
}

impl Role {
    /// The fixed role → dashboard table used when a sign-in carries no usable
    /// explicit redirect. One destination per role, no role shares one.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Owner => "/owner",
            Role::Team => "/team",
            Role::Partner => "/partners",
            Role::Investor => "/investors",
        }
    }

    pub const ALL: [Role; 4] = [Role::Owner, Role::Team, Role::Partner, Role::Investor];
}

/// Profile
///
/// The principal record returned by the external identity provider on a
/// successful sign-in. Only the fields this service acts on are kept.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for the role-authenticated sign-in endpoint (POST /login).
/// The password is only passed through to the external identity provider and never
/// persisted or logged internally by this application.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// ClientLoginRequest
///
/// Input payload for the client-portal login (POST /clients/login). The code is
/// a short client identifier; matching is case-insensitive on the code and exact
/// on the password.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ClientLoginRequest {
    pub code: String,
    pub password: String,
}

/// UnlockRequest
///
/// Input payload for the password gate (POST /gate/unlock). `storage_key` names
/// the protected resource the caller wants opened for the rest of their session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UnlockRequest {
    pub storage_key: String,
    pub password: String,
}

/// PageActionRequest
///
/// Input payload for the administrative archive/delete endpoints. `file_path` is
/// the page file's path relative to the site root, exactly as reported by the
/// inventory scan.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PageActionRequest {
    pub file_path: String,
}

// --- Response Schemas (Output) ---

/// SessionResponse
///
/// Output of POST /session: a fresh anonymous visitor session and the signed
/// bearer token that binds the browser tab to it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub token: String,
}

/// LoginResponse
///
/// Output of a successful role-authenticated sign-in. `redirect` is returned as
/// a value for the caller to act on; the server never navigates on its behalf.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub redirect: String,
}

/// ClientLoginResponse
///
/// Output of a successful client-portal login: the normalized client code now
/// active on the session, and the client's configured destination.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ClientLoginResponse {
    pub code: String,
    pub redirect: String,
}

/// ClientSessionResponse
///
/// Output of GET /clients/session: the active client identity on this session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ClientSessionResponse {
    pub code: String,
}

/// GateStatusResponse
///
/// Current unlock state of one protected resource for the calling session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct GateStatusResponse {
    pub storage_key: String,
    pub unlocked: bool,
}

/// ResourceView
///
/// The gated content descriptor released once a resource is unlocked for the
/// calling session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ResourceView {
    pub storage_key: String,
    pub title: String,
    pub description: String,
}

/// MeResponse
///
/// Output schema for the authenticated user's session view (GET /me).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MeResponse {
    pub session_id: Uuid,
    pub role: Role,
    pub dashboard: String,
}

/// ErrorResponse
///
/// Uniform inline error body for user-facing authentication failures. Provider
/// messages are surfaced verbatim; directory failures use the generic
/// non-leaking message.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

// --- Page Inventory Schemas ---

/// PageCategory
///
/// Closed set of audit categories the route categorizer assigns. Exactly one
/// category per page; ordered path predicates decide which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum PageCategory {
    Public,
    ClientPortal,
    Investor,
    Team,
    Partner,
    VisualTest,
    Admin,
    Api,
}

/// PageEntry
///
/// One row of the page inventory: derived, read-only, regenerated on every scan.
/// The filesystem remains the source of truth; this record is advisory output
/// for operators auditing the route tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageEntry {
    pub route: String,
    pub category: PageCategory,
    pub title: String,
    pub file_path: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub file_size: Option<String>,
    /// Path-convention heuristic, not proof that a gate component is present.
    pub is_protected: bool,
    pub is_duplicate: bool,
}
