use super::*;

#[test]
fn retryable_codes_match_expectations() {
    assert!(StatusCode::RateLimited.is_retryable());
    assert!(StatusCode::ServiceUnavailable.is_retryable());
    assert!(!StatusCode::AuthenticationFailed.is_retryable());
    assert!(!StatusCode::InvalidArguments.is_retryable());
}

#[test]
fn category_assignment() {
    assert_eq!(StatusCode::ToolNotFound.category(), StatusCategory::Tool);
    assert_eq!(StatusCode::InvalidConfig.category(), StatusCategory::Config);
}

#[test]
fn from_i32_round_trips() {
    assert_eq!(StatusCode::from_i32(13_000), Some(StatusCode::ToolNotFound));
    assert_eq!(StatusCode::from_i32(99_999), None);
}

#[test]
fn display_uses_variant_name() {
    assert_eq!(StatusCode::Timeout.to_string(), "Timeout");
}
