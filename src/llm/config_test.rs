use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_provider_env() {
    unsafe {
        std::env::remove_var(API_TOKEN_VAR);
        std::env::remove_var("REPLICATE_API_BASE_URL");
        std::env::remove_var("REPLICATE_MODEL_VERSION");
        std::env::remove_var("REPLICATE_MODEL_LABEL");
        std::env::remove_var("PROVIDER_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("PROVIDER_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("PREDICTION_POLL_INTERVAL_MS");
        std::env::remove_var("PREDICTION_POLL_MAX_ATTEMPTS");
    }
}

#[test]
fn provider_config_from_env() {
    // One test for every env case; the process env is shared.
    unsafe {
        clear_provider_env();
    }
    let err = ProviderConfig::from_env().unwrap_err();
    assert!(matches!(err, ProviderError::MissingApiToken { ref var } if var == API_TOKEN_VAR));

    unsafe { std::env::set_var(API_TOKEN_VAR, "   ") };
    assert!(ProviderConfig::from_env().is_err());

    unsafe { std::env::set_var(API_TOKEN_VAR, "r8_secret") };
    let cfg = ProviderConfig::from_env().unwrap();
    assert_eq!(cfg.api_token, "r8_secret");
    assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.model_version, DEFAULT_MODEL_VERSION);
    assert_eq!(cfg.model_label, DEFAULT_MODEL_LABEL);
    assert_eq!(
        cfg.timeouts,
        ProviderTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );

    unsafe {
        std::env::set_var("REPLICATE_API_BASE_URL", "http://localhost:9999/v1/");
        std::env::set_var("REPLICATE_MODEL_VERSION", "acme/tiny");
        std::env::set_var("PROVIDER_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("PROVIDER_CONNECT_TIMEOUT_SECS", "not-a-number");
        std::env::set_var("PREDICTION_POLL_INTERVAL_MS", "10");
        std::env::set_var("PREDICTION_POLL_MAX_ATTEMPTS", "3");
    }
    let cfg = ProviderConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "http://localhost:9999/v1");
    assert_eq!(cfg.model_version, "acme/tiny");
    assert_eq!(cfg.timeouts, ProviderTimeouts { request_secs: 5, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS });

    let policy = PollPolicy::from_env();
    assert_eq!(policy.interval, Duration::from_millis(10));
    assert_eq!(policy.max_attempts, 3);

    unsafe { std::env::set_var("PREDICTION_POLL_MAX_ATTEMPTS", "0") };
    assert_eq!(PollPolicy::from_env().max_attempts, 1);

    unsafe { clear_provider_env() };
}

#[test]
fn poll_policy_default_matches_constants() {
    let policy = PollPolicy::default();
    assert_eq!(policy.interval, Duration::from_millis(2000));
    assert_eq!(policy.max_attempts, 60);
}

#[test]
fn missing_dotenv_file_is_not_a_failure() {
    let missing = std::env::temp_dir().join(format!("assistant-relay-{}.env", uuid::Uuid::new_v4()));
    assert!(dotenv_failure(dotenvy::from_path(&missing)).is_none());
}

#[test]
fn malformed_dotenv_file_is_reported() {
    let path = std::env::temp_dir().join(format!("assistant-relay-{}.env", uuid::Uuid::new_v4()));
    std::fs::write(&path, "FOO BAR\n").unwrap();

    let failure = dotenv_failure(dotenvy::from_path(&path));
    std::fs::remove_file(&path).unwrap();

    let err = failure.expect("malformed line should be reported");
    assert!(!err.not_found());
}
