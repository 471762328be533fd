use super::*;

fn request(modes: &[TransportMode]) -> RouteRequest {
    #[allow(clippy::cast_precision_loss)]
    let points = (0..=modes.len()).map(|i| [0.0, i as f64]).collect();
    RouteRequest { points, modes: modes.to_vec() }
}

#[test]
fn request_serializes_points_and_lowercase_modes() {
    let req = RouteRequest {
        points: vec![[0.0, 0.0], [0.0, 1.0]],
        modes: vec![TransportMode::Walk],
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json, serde_json::json!({ "points": [[0.0, 0.0], [0.0, 1.0]], "modes": ["walk"] }));
}

#[test]
fn parse_valid_response() {
    let body = r#"{"segments":[{"mode":"bus","coordinates":[[0,0],[0.5,0.5],[1,1]]}]}"#;
    let resp = parse_response(body).unwrap();
    assert_eq!(resp.segments.len(), 1);
    assert_eq!(resp.segments[0].mode, TransportMode::Bus);
    assert_eq!(resp.segments[0].coordinates.len(), 3);
}

#[test]
fn parse_rejects_unknown_fields() {
    let body = r#"{"segments":[],"distance":12}"#;
    assert!(matches!(parse_response(body), Err(RouteError::Parse(_))));

    let body = r#"{"segments":[{"mode":"car","coordinates":[],"color":"red"}]}"#;
    assert!(matches!(parse_response(body), Err(RouteError::Parse(_))));
}

#[test]
fn parse_rejects_guessed_field_names() {
    let body = r#"{"routes":[{"mode":"car","coords":[[0,0],[1,1]]}]}"#;
    assert!(matches!(parse_response(body), Err(RouteError::Parse(_))));
}

#[test]
fn parse_rejects_unknown_mode() {
    let body = r#"{"segments":[{"mode":"ferry","coordinates":[[0,0],[1,1]]}]}"#;
    assert!(matches!(parse_response(body), Err(RouteError::Parse(_))));
}

#[test]
fn into_polylines_converts_lon_lat_order() {
    let req = request(&[TransportMode::Walk]);
    let resp = RouteResponse {
        segments: vec![RouteSegment { mode: TransportMode::Walk, coordinates: vec![[10.0, 50.0], [11.0, 51.0]] }],
    };
    let lines = resp.into_polylines(&req).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].coordinates[0], LatLng::new(50.0, 10.0));
    assert_eq!(lines[0].coordinates[1], LatLng::new(51.0, 11.0));
}

#[test]
fn into_polylines_rejects_segment_count_mismatch() {
    let req = request(&[TransportMode::Walk, TransportMode::Car]);
    let resp = RouteResponse {
        segments: vec![RouteSegment { mode: TransportMode::Walk, coordinates: vec![[0.0, 0.0], [1.0, 1.0]] }],
    };
    let err = resp.into_polylines(&req).unwrap_err();
    assert!(matches!(err, RouteError::Schema(ref m) if m.contains("expected 2 segments")));
}

#[test]
fn into_polylines_rejects_mode_mismatch() {
    let req = request(&[TransportMode::Walk]);
    let resp = RouteResponse {
        segments: vec![RouteSegment { mode: TransportMode::Car, coordinates: vec![[0.0, 0.0], [1.0, 1.0]] }],
    };
    assert!(matches!(resp.into_polylines(&req), Err(RouteError::Schema(_))));
}

#[test]
fn into_polylines_rejects_degenerate_and_out_of_range_geometry() {
    let req = request(&[TransportMode::Bus]);
    let short = RouteResponse {
        segments: vec![RouteSegment { mode: TransportMode::Bus, coordinates: vec![[0.0, 0.0]] }],
    };
    assert!(matches!(short.into_polylines(&req), Err(RouteError::Schema(_))));

    let far = RouteResponse {
        segments: vec![RouteSegment { mode: TransportMode::Bus, coordinates: vec![[0.0, 0.0], [200.0, 0.0]] }],
    };
    assert!(matches!(far.into_polylines(&req), Err(RouteError::Schema(_))));
}

#[test]
fn retryable_errors() {
    assert!(RouteError::Request("reset".into()).retryable());
    assert!(RouteError::Status { status: 503, body: String::new() }.retryable());
    assert!(RouteError::Status { status: 429, body: String::new() }.retryable());
    assert!(!RouteError::Status { status: 400, body: String::new() }.retryable());
    assert!(!RouteError::Schema("x".into()).retryable());
    assert_eq!(RouteError::Parse("x".into()).error_code(), "E_ROUTE_PARSE");
}
