/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// enforcing a Defense-in-Depth strategy. This structure ensures that
/// access control is applied explicitly at the module level (via Axum layers),
/// preventing accidental exposure of protected endpoints.
///
/// The three modules map directly to the defined access tiers.

/// Routes accessible without a role: the session lifecycle, both login
/// surfaces, and the password-gate endpoints. Handlers that need per-session
/// state enforce it via the `ActiveSession` extractor.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a role-authenticated session.
pub mod authenticated;

/// Routes restricted exclusively to sessions with the Owner role.
/// Implements mandatory authorization checks.
pub mod admin;
