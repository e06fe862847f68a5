use serial_test::serial;
use studio_portal::config::{AppConfig, Env};

#[test]
#[serial]
fn test_default_config_is_safe_for_tests() {
    let config = AppConfig::default();
    assert_eq!(config.env, Env::Local);
    assert!(!config.session_secret.is_empty());
    assert_eq!(config.site_root, ".");
    assert_eq!(config.archive_dir, "_archive");
    assert_eq!(config.deletion_log, "logs/deletions.log");
}

#[test]
#[serial]
fn test_load_reads_environment_overrides() {
    unsafe {
        std::env::set_var("APP_ENV", "local");
        std::env::set_var("SITE_ROOT", "/srv/site");
        std::env::set_var("IDENTITY_URL", "http://identity.local");
        std::env::set_var("ARCHIVE_DIR", "attic");
    }

    let config = AppConfig::load();
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.site_root, "/srv/site");
    assert_eq!(config.identity_url, "http://identity.local");
    assert_eq!(config.archive_dir, "attic");

    unsafe {
        std::env::remove_var("APP_ENV");
        std::env::remove_var("SITE_ROOT");
        std::env::remove_var("IDENTITY_URL");
        std::env::remove_var("ARCHIVE_DIR");
    }
}

#[test]
#[serial]
fn test_load_falls_back_to_local_defaults() {
    unsafe {
        std::env::remove_var("APP_ENV");
        std::env::remove_var("SITE_ROOT");
        std::env::remove_var("IDENTITY_URL");
        std::env::remove_var("ARCHIVE_DIR");
        std::env::remove_var("SESSION_SECRET");
    }

    let config = AppConfig::load();
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.site_root, ".");
    assert!(!config.session_secret.is_empty());
}
