use crate::{
    AppState,
    auth::{ActiveSession, AuthUser, issue_session_token, resolve_redirect},
    directory, gate, inventory,
    inventory::DeletionAction,
    models::{
        ClientLoginRequest, ClientLoginResponse, ClientSessionResponse, ErrorResponse,
        GateStatusResponse, LoginRequest, LoginResponse, MeResponse, PageActionRequest, PageEntry,
        ResourceView, Role, SessionResponse, UnlockRequest,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

/// Rejection type for handlers whose failures carry a user-facing message.
type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn error_reply(status: StatusCode, message: impl Into<String>) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// --- Filter Structs ---

/// RedirectQuery
///
/// Accepted query parameters for the role sign-in endpoint (POST /login).
/// An explicit `redirect` is honored after authentication unless it points back
/// at the login path.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

// --- Session Lifecycle ---

/// create_session
///
/// [Public Route] Starts an anonymous visitor session — the explicit
/// session-start moment of the credential store's lifecycle. The returned
/// bearer token is what a browser tab holds for the rest of its visit; gate
/// unlocks and the client identity attach to this session.
#[utoipa::path(
    post,
    path = "/session",
    responses((status = 200, description = "Session created", body = SessionResponse))
)]
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let session_id = state.sessions.create().await;

    let token = issue_session_token(session_id, &state.config.session_secret).map_err(|e| {
        tracing::error!("session token signing failed: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(SessionResponse { session_id, token }))
}

/// sign_out
///
/// [Public Route, session required] Destroys the caller's session entirely.
/// Every credential the session carried (role, client identity, gate unlocks)
/// dies with it; the token becomes useless even before it expires.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Session destroyed"))
)]
pub async fn sign_out(session: ActiveSession, State(state): State<AppState>) -> StatusCode {
    state.sessions.destroy(session.session_id).await;
    StatusCode::NO_CONTENT
}

// --- Role-Authenticated Sign-In ---

/// sign_in
///
/// [Public Route] Role-authenticated sign-in. Credential verification is fully
/// delegated to the external identity provider; on success this handler creates
/// a role-carrying session, signs its bearer token, and resolves the redirect
/// destination (explicit `redirect` parameter unless it points back at the
/// login path, otherwise the fixed role → dashboard table).
///
/// *Failure*: the provider's message is surfaced verbatim in a 401 body. The
/// form stays usable — no retry limit is enforced at this layer.
#[utoipa::path(
    post,
    path = "/login",
    params(RedirectQuery),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse)
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Query(query): Query<RedirectQuery>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ErrorReply> {
    let profile = state
        .identity
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| error_reply(StatusCode::UNAUTHORIZED, e.message))?;

    let session_id = state.sessions.create().await;
    state.sessions.set_role(session_id, profile.role).await;

    let token = issue_session_token(session_id, &state.config.session_secret).map_err(|e| {
        tracing::error!("session token signing failed: {:?}", e);
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?;

    let redirect = resolve_redirect(query.redirect.as_deref(), profile.role);

    Ok(Json(LoginResponse {
        token,
        role: profile.role,
        redirect,
    }))
}

/// get_me
///
/// [Authenticated Route] The authenticated user's session view: resolved role
/// and the dashboard that role lands on.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Session profile", body = MeResponse))
)]
pub async fn get_me(AuthUser { session_id, role }: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        session_id,
        role,
        dashboard: role.dashboard_path().to_string(),
    })
}

// --- Client Credential Directory ---

/// client_sign_in
///
/// [Public Route, session required] Client-portal login against the static
/// credential directory. The submitted code is normalized (trimmed, uppercased)
/// before lookup; unknown codes and wrong secrets yield the same generic error
/// so responses never reveal which codes exist. On success the client code is
/// written into the session as the active client identity and the entry's
/// configured destination is returned for the caller to navigate to.
#[utoipa::path(
    post,
    path = "/clients/login",
    request_body = ClientLoginRequest,
    responses(
        (status = 200, description = "Client authenticated", body = ClientLoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn client_sign_in(
    session: ActiveSession,
    State(state): State<AppState>,
    Json(payload): Json<ClientLoginRequest>,
) -> Result<Json<ClientLoginResponse>, ErrorReply> {
    let entry = directory::authenticate(&payload.code, &payload.password)
        .map_err(|e| error_reply(StatusCode::UNAUTHORIZED, e.message()))?;

    state
        .sessions
        .set_client(session.session_id, entry.code)
        .await;

    Ok(Json(ClientLoginResponse {
        code: entry.code.to_string(),
        redirect: entry.redirect_path.to_string(),
    }))
}

/// client_session
///
/// [Public Route, session required] Reads the active client identity on the
/// caller's session. 401 when no client login has happened this session — the
/// client dashboard uses this to bounce unauthenticated visitors to its login.
#[utoipa::path(
    get,
    path = "/clients/session",
    responses(
        (status = 200, description = "Active client identity", body = ClientSessionResponse),
        (status = 401, description = "No client identity on this session")
    )
)]
pub async fn client_session(
    session: ActiveSession,
) -> Result<Json<ClientSessionResponse>, StatusCode> {
    match session.data.client_code {
        Some(code) => Ok(Json(ClientSessionResponse { code })),
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

/// client_sign_out
///
/// [Public Route, session required] Clears only the active client identity,
/// leaving the rest of the session (gate unlocks) intact.
#[utoipa::path(
    post,
    path = "/clients/logout",
    responses((status = 204, description = "Client identity cleared"))
)]
pub async fn client_sign_out(session: ActiveSession, State(state): State<AppState>) -> StatusCode {
    state.sessions.clear_client(session.session_id).await;
    StatusCode::NO_CONTENT
}

// --- Password Gate ---

/// gate_status
///
/// [Public Route, session required] The mount-time check: reads the unlock flag
/// for one protected resource on the calling session. No side effects, so the
/// caller can safely probe before deciding which branch to render.
#[utoipa::path(
    get,
    path = "/gate/{storage_key}",
    params(("storage_key" = String, Path, description = "Protected resource key")),
    responses(
        (status = 200, description = "Gate state", body = GateStatusResponse),
        (status = 404, description = "Unknown resource")
    )
)]
pub async fn gate_status(
    session: ActiveSession,
    State(state): State<AppState>,
    Path(storage_key): Path<String>,
) -> Result<Json<GateStatusResponse>, StatusCode> {
    if gate::find_resource(&storage_key).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    let unlocked = state
        .sessions
        .is_unlocked(session.session_id, &storage_key)
        .await;

    Ok(Json(GateStatusResponse {
        storage_key,
        unlocked,
    }))
}

/// unlock_resource
///
/// [Public Route, session required] The submit side of the password gate. An
/// exact secret match flips the resource's unlock flag on the session —
/// terminal for the session's lifetime; a mismatch returns the inline error and
/// leaves the gate locked. Each storage key tracks its own flag, so unlocking
/// one resource reveals nothing about another.
#[utoipa::path(
    post,
    path = "/gate/unlock",
    request_body = UnlockRequest,
    responses(
        (status = 200, description = "Unlocked", body = GateStatusResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 404, description = "Unknown resource", body = ErrorResponse)
    )
)]
pub async fn unlock_resource(
    session: ActiveSession,
    State(state): State<AppState>,
    Json(payload): Json<UnlockRequest>,
) -> Result<Json<GateStatusResponse>, ErrorReply> {
    let resource = gate::find_resource(&payload.storage_key)
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Unknown resource"))?;

    gate::verify(resource, &payload.password)
        .map_err(|e| error_reply(StatusCode::UNAUTHORIZED, e.message()))?;

    state
        .sessions
        .grant_unlock(session.session_id, resource.storage_key)
        .await;

    Ok(Json(GateStatusResponse {
        storage_key: payload.storage_key,
        unlocked: true,
    }))
}

/// get_protected_content
///
/// [Public Route, session required] Serves a gated resource's content
/// descriptor — but only once the calling session has unlocked it. Locked
/// sessions get the challenge message instead of any content, so nothing
/// protected ever renders before the check passes.
#[utoipa::path(
    get,
    path = "/content/{storage_key}",
    params(("storage_key" = String, Path, description = "Protected resource key")),
    responses(
        (status = 200, description = "Unlocked content", body = ResourceView),
        (status = 401, description = "Locked", body = ErrorResponse),
        (status = 404, description = "Unknown resource", body = ErrorResponse)
    )
)]
pub async fn get_protected_content(
    session: ActiveSession,
    State(state): State<AppState>,
    Path(storage_key): Path<String>,
) -> Result<Json<ResourceView>, ErrorReply> {
    let resource = gate::find_resource(&storage_key)
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, "Unknown resource"))?;

    let unlocked = state
        .sessions
        .is_unlocked(session.session_id, resource.storage_key)
        .await;

    if !unlocked {
        return Err(error_reply(
            StatusCode::UNAUTHORIZED,
            "This content is password protected",
        ));
    }

    Ok(Json(ResourceView {
        storage_key: resource.storage_key.to_string(),
        title: resource.title.to_string(),
        description: resource.description.to_string(),
    }))
}

// --- Page Inventory (Admin) ---

/// list_pages
///
/// [Admin Route] Runs the route-tree scan and returns the full page inventory.
///
/// *Authorization*: explicitly checks that the resolved role is Owner — site
/// administration is an owner-only surface.
#[utoipa::path(
    get,
    path = "/admin/pages",
    responses(
        (status = 200, description = "Page inventory", body = [PageEntry]),
        (status = 403, description = "Owner role required")
    )
)]
pub async fn list_pages(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PageEntry>>, StatusCode> {
    if role != Role::Owner {
        return Err(StatusCode::FORBIDDEN);
    }

    match inventory::scan_pages(std::path::Path::new(&state.config.site_root)) {
        Ok(pages) => Ok(Json(pages)),
        Err(e) => {
            tracing::error!("page scan failed: {:?}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// archive_page
///
/// [Admin Route] Soft-deletes a page file: moves it under the archive tree and
/// appends an audit line. Filesystem failures surface directly with the error
/// text — these are supervised, low-frequency operator actions.
#[utoipa::path(
    post,
    path = "/admin/pages/archive",
    request_body = PageActionRequest,
    responses(
        (status = 204, description = "Archived"),
        (status = 403, description = "Owner role required", body = ErrorResponse),
        (status = 500, description = "Filesystem error", body = ErrorResponse)
    )
)]
pub async fn archive_page(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PageActionRequest>,
) -> Result<StatusCode, ErrorReply> {
    if role != Role::Owner {
        return Err(error_reply(StatusCode::FORBIDDEN, "Owner role required"));
    }

    let site_root = std::path::Path::new(&state.config.site_root);

    inventory::archive_page(site_root, &payload.file_path, &state.config.archive_dir).map_err(
        |e| {
            tracing::error!("archive failed for {}: {:?}", payload.file_path, e);
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        },
    )?;

    inventory::log_deletion(
        site_root,
        &state.config.deletion_log,
        &payload.file_path,
        DeletionAction::Archive,
    )
    .map_err(|e| {
        tracing::error!("audit log append failed: {:?}", e);
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// delete_page
///
/// [Admin Route] Permanently removes a page file and appends an audit line.
/// There is no undo beyond manual file recovery.
#[utoipa::path(
    delete,
    path = "/admin/pages",
    request_body = PageActionRequest,
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Owner role required", body = ErrorResponse),
        (status = 500, description = "Filesystem error", body = ErrorResponse)
    )
)]
pub async fn delete_page(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<PageActionRequest>,
) -> Result<StatusCode, ErrorReply> {
    if role != Role::Owner {
        return Err(error_reply(StatusCode::FORBIDDEN, "Owner role required"));
    }

    let site_root = std::path::Path::new(&state.config.site_root);

    inventory::delete_page(site_root, &payload.file_path).map_err(|e| {
        tracing::error!("delete failed for {}: {:?}", payload.file_path, e);
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    inventory::log_deletion(
        site_root,
        &state.config.deletion_log,
        &payload.file_path,
        DeletionAction::Delete,
    )
    .map_err(|e| {
        tracing::error!("audit log append failed: {:?}", e);
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(StatusCode::NO_CONTENT)
}
