use std::sync::{Mutex, MutexGuard};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// # Safety
/// Callers must hold `ENV_LOCK`.
unsafe fn clear_moments_env() {
    unsafe {
        std::env::remove_var("PORT");
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("MOMENTS_STORAGE");
        std::env::remove_var("MOMENTS_API_URL");
        std::env::remove_var("MOMENTS_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("MOMENTS_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("MOMENTS_LOCALE");
    }
}

#[test]
fn server_config_requires_database_url_for_postgres() {
    let _env = lock_env();
    unsafe { clear_moments_env() };

    let err = ServerConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
}

#[test]
fn server_config_reads_postgres_and_port() {
    let _env = lock_env();
    unsafe {
        clear_moments_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/moments");
        std::env::set_var("PORT", "8080");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.storage, Storage::Postgres { database_url: "postgres://localhost/moments".into() });

    unsafe { clear_moments_env() };
}

#[test]
fn server_config_memory_storage_needs_no_database() {
    let _env = lock_env();
    unsafe {
        clear_moments_env();
        std::env::set_var("MOMENTS_STORAGE", "memory");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.storage, Storage::Memory);

    unsafe { clear_moments_env() };
}

#[test]
fn server_config_rejects_bad_port() {
    let _env = lock_env();
    unsafe {
        clear_moments_env();
        std::env::set_var("MOMENTS_STORAGE", "memory");
        std::env::set_var("PORT", "not-a-port");
    }

    let err = ServerConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

    unsafe { clear_moments_env() };
}

#[test]
fn client_config_defaults() {
    let _env = lock_env();
    unsafe { clear_moments_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.timeouts, ClientTimeouts::default());
    assert_eq!(cfg.locale, Locale::Ru);
}

#[test]
fn client_config_overrides_and_trims_url() {
    let _env = lock_env();
    unsafe {
        clear_moments_env();
        std::env::set_var("MOMENTS_API_URL", "https://functions.example.test/moments/");
        std::env::set_var("MOMENTS_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("MOMENTS_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("MOMENTS_LOCALE", "en");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_url, "https://functions.example.test/moments");
    assert_eq!(cfg.timeouts, ClientTimeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.locale, Locale::En);

    unsafe { clear_moments_env() };
}

#[test]
fn parse_locale_rejects_unknown() {
    assert!(parse_locale(Some("fr")).is_err());
}

#[test]
fn timeouts_read_without_touching_locale() {
    let _env = lock_env();
    unsafe {
        clear_moments_env();
        std::env::set_var("MOMENTS_REQUEST_TIMEOUT_SECS", "7");
        std::env::set_var("MOMENTS_CONNECT_TIMEOUT_SECS", "not-a-number");
        std::env::set_var("MOMENTS_LOCALE", "fr");
    }

    let timeouts = ClientTimeouts::from_env();
    assert_eq!(timeouts, ClientTimeouts { request_secs: 7, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS });
    assert!(ClientConfig::from_env().is_err());

    unsafe { clear_moments_env() };
}
