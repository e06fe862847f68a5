use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all threads and services
/// (session store, identity provider, inventory scanner). It is pulled into the
/// application state via FromRef, embodying the "immutable AppConfig" part of the
/// Unified State Pattern.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls feature activation (e.g., Dev Bypass).
    pub env: Env,
    // Base URL of the external identity provider used for role-authenticated sign-in.
    pub identity_url: String,
    // API key sent to the identity provider on every request.
    pub identity_api_key: String,
    // Secret key used to sign and validate session bearer tokens.
    pub session_secret: String,
    // Root of the website checkout whose `app/` route tree the inventory tool scans.
    pub site_root: String,
    // Directory (relative to site_root) that archived page files are moved into.
    pub archive_dir: String,
    // Append-only audit log (relative to site_root) for archive/delete actions.
    pub deletion_log: String,
}

/// Env
///
/// Defines the runtime context, used to switch between development utilities
/// (header bypass, pretty logs) and production-grade infrastructure (hardened auth,
/// JSON logs).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows us to instantiate the configuration without needing to set environment
    /// variables for lightweight unit or integration testing state scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            identity_url: "http://localhost:9999".to_string(),
            identity_api_key: "local-anon-key".to_string(),
            session_secret: "super-secure-test-secret-value-local".to_string(),
            site_root: ".".to_string(),
            archive_dir: "_archive".to_string(),
            deletion_log: "logs/deletions.log".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables and implements the **fail-fast**
    /// principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current runtime
    /// environment (especially Production) is not found. This prevents the application
    /// from starting with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // Session Secret Resolution
        // The production secret is mandatory and must be explicitly set.
        let session_secret = match env {
            Env::Production => env::var("SESSION_SECRET")
                .expect("FATAL: SESSION_SECRET must be set in production."),
            // In local, we provide a fallback, though the developer should ideally use a real secret.
            _ => env::var("SESSION_SECRET")
                .unwrap_or_else(|_| "super-secure-test-secret-value-local".to_string()),
        };

        // Inventory paths share defaults across environments; operators override them
        // when the website checkout lives elsewhere.
        let site_root = env::var("SITE_ROOT").unwrap_or_else(|_| ".".to_string());
        let archive_dir = env::var("ARCHIVE_DIR").unwrap_or_else(|_| "_archive".to_string());
        let deletion_log =
            env::var("DELETION_LOG").unwrap_or_else(|_| "logs/deletions.log".to_string());

        match env {
            Env::Local => Self {
                env: Env::Local,
                // Local identity defaults point at a development stack (or the mock provider).
                identity_url: env::var("IDENTITY_URL")
                    .unwrap_or_else(|_| "http://localhost:9999".to_string()),
                identity_api_key: env::var("IDENTITY_API_KEY")
                    .unwrap_or_else(|_| "local-anon-key".to_string()),
                session_secret,
                site_root,
                archive_dir,
                deletion_log,
            },
            Env::Production => Self {
                env: Env::Production,
                // Production demands explicit setting of the identity service coordinates.
                identity_url: env::var("IDENTITY_URL")
                    .expect("FATAL: IDENTITY_URL required in prod"),
                identity_api_key: env::var("IDENTITY_API_KEY")
                    .expect("FATAL: IDENTITY_API_KEY required in prod"),
                session_secret,
                site_root,
                archive_dir,
                deletion_log,
            },
        }
    }
}
