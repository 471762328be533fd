use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn empty_environment_yields_defaults() {
    let cfg = TripConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, TripConfig::default());
    assert_eq!(cfg.route.base_url, DEFAULT_ROUTE_SERVICE_URL);
    assert_eq!(cfg.route.token, None);
    assert!(cfg.location.high_accuracy);
    assert_eq!(cfg.location.timeout, Duration::from_millis(GEO_TIMEOUT_MS));
    assert!((cfg.camera.zoom - RECENTER_ZOOM).abs() < f64::EPSILON);
}

#[test]
fn overrides_are_parsed() {
    let cfg = TripConfig::from_lookup(lookup(&[
        ("ROUTE_SERVICE_URL", "https://routes.example.test/"),
        ("ROUTE_API_TOKEN_ENV", "MY_ROUTE_TOKEN"),
        ("MY_ROUTE_TOKEN", "abc123"),
        ("ROUTE_REQUEST_TIMEOUT_SECS", "12"),
        ("ROUTE_CONNECT_TIMEOUT_SECS", "3"),
        ("GEO_HIGH_ACCURACY", "false"),
        ("GEO_TIMEOUT_MS", "5000"),
        ("GEO_MAX_AGE_MS", "0"),
        ("GEO_MIN_DISTANCE_M", "25.5"),
        ("CAMERA_ZOOM", "14"),
        ("CAMERA_PITCH", "0"),
        ("CAMERA_ANIMATION_MS", "500"),
        ("CAMERA_RECENTER_M", "2"),
    ]))
    .unwrap();

    assert_eq!(
        cfg.route,
        RouteServiceConfig {
            base_url: "https://routes.example.test".into(),
            token: Some("abc123".into()),
            request_timeout_secs: 12,
            connect_timeout_secs: 3,
        }
    );
    assert!(!cfg.location.high_accuracy);
    assert_eq!(cfg.location.timeout, Duration::from_millis(5000));
    assert_eq!(cfg.location.maximum_age, Duration::ZERO);
    assert!((cfg.location.min_distance_m - 25.5).abs() < f64::EPSILON);
    assert!((cfg.camera.zoom - 14.0).abs() < f64::EPSILON);
    assert_eq!(cfg.camera.animation_ms, 500);
}

#[test]
fn missing_named_token_is_an_error() {
    let err = TripConfig::from_lookup(lookup(&[("ROUTE_API_TOKEN_ENV", "NOT_THERE")])).unwrap_err();
    assert_eq!(err, ConfigError::MissingToken { var: "NOT_THERE".into() });
    assert_eq!(err.error_code(), "E_CONFIG_MISSING_TOKEN");
}

#[test]
fn unparsable_numbers_fall_back_to_defaults() {
    let cfg = TripConfig::from_lookup(lookup(&[("ROUTE_REQUEST_TIMEOUT_SECS", "soon"), ("CAMERA_ZOOM", "far")])).unwrap();
    assert_eq!(cfg.route.request_timeout_secs, DEFAULT_ROUTE_REQUEST_TIMEOUT_SECS);
    assert!((cfg.camera.zoom - RECENTER_ZOOM).abs() < f64::EPSILON);
}

#[test]
fn unparsable_boolean_is_an_error() {
    let err = TripConfig::from_lookup(lookup(&[("GEO_HIGH_ACCURACY", "maybe")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { key: "GEO_HIGH_ACCURACY", ref value } if value == "maybe"));
    assert!(!err.retryable());
}

// =============================================================================
// from_env
// =============================================================================

#[test]
fn from_env_reads_process_environment() {
    unsafe {
        std::env::set_var("ROUTE_API_TOKEN_ENV", "__TRIPMAP_TEST_TOKEN__");
        std::env::set_var("__TRIPMAP_TEST_TOKEN__", "from-env");
    }
    let cfg = TripConfig::from_env().unwrap();
    assert_eq!(cfg.route.token.as_deref(), Some("from-env"));
    unsafe {
        std::env::remove_var("ROUTE_API_TOKEN_ENV");
        std::env::remove_var("__TRIPMAP_TEST_TOKEN__");
    }
}

#[test]
fn non_finite_floats_fall_back_to_defaults() {
    let cfg = TripConfig::from_lookup(lookup(&[
        ("GEO_MIN_DISTANCE_M", "inf"),
        ("CAMERA_ZOOM", "NaN"),
        ("CAMERA_PITCH", "-inf"),
        ("CAMERA_RECENTER_M", "NaN"),
    ]))
    .unwrap();
    assert_eq!(cfg.location, WatchOptions::default());
    assert_eq!(cfg.camera, CameraSettings::default());
}
