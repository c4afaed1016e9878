use super::*;
use std::sync::Mutex;

// Env is process-global; tests in this module take this lock so they do not
// observe each other's variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// # Safety
/// Callers must hold `ENV_LOCK`.
unsafe fn clear_orderdesk_env() {
    unsafe {
        std::env::remove_var("ORDERDESK_IDENTITY_URL");
        std::env::remove_var("ORDERDESK_STORE_PATH");
        std::env::remove_var("ORDERDESK_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("ORDERDESK_CONNECT_TIMEOUT_SECS");
    }
}

// =============================================================================
// Config::from_env
// =============================================================================

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_orderdesk_env() };

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.identity.url, DEFAULT_IDENTITY_URL);
    assert_eq!(cfg.identity.timeouts, Timeouts::default());
    assert!(cfg.store_path.ends_with(".orderdesk/storage.json"));
}

#[test]
fn from_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_orderdesk_env();
        std::env::set_var("ORDERDESK_IDENTITY_URL", "http://127.0.0.1:9000/login");
        std::env::set_var("ORDERDESK_STORE_PATH", "/tmp/orderdesk-test/store.json");
        std::env::set_var("ORDERDESK_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("ORDERDESK_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.identity.url, "http://127.0.0.1:9000/login");
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/orderdesk-test/store.json"));
    assert_eq!(cfg.identity.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_orderdesk_env() };
}

#[test]
fn from_env_bad_timeouts_fall_back() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_orderdesk_env();
        std::env::set_var("ORDERDESK_REQUEST_TIMEOUT_SECS", "soon");
        std::env::set_var("ORDERDESK_CONNECT_TIMEOUT_SECS", "0");
    }

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.identity.timeouts, Timeouts::default());

    unsafe { clear_orderdesk_env() };
}

#[test]
fn from_env_rejects_bad_url() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_orderdesk_env();
        std::env::set_var("ORDERDESK_IDENTITY_URL", "not a url");
    }

    let err = Config::from_env().unwrap_err().to_string();
    assert!(err.contains("invalid identity URL"));

    unsafe { clear_orderdesk_env() };
}

// =============================================================================
// IdentityConfig::new
// =============================================================================

#[test]
fn identity_config_accepts_https() {
    let cfg = IdentityConfig::new(" https://example.test/v1/users ").unwrap();
    assert_eq!(cfg.url, "https://example.test/v1/users");
    assert_eq!(cfg.timeouts, Timeouts::default());
}

#[test]
fn identity_config_rejects_other_schemes() {
    let err = IdentityConfig::new("ftp://example.test/users").unwrap_err();
    assert!(err.to_string().contains("unsupported scheme 'ftp'"));
}

#[test]
fn default_store_path_ends_with_file_name() {
    assert!(default_store_path().ends_with(PathBuf::from(STORE_DIR_NAME).join(STORE_FILE_NAME)));
}
