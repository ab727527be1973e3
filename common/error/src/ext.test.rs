use super::*;

#[test]
fn plain_error_carries_message_and_code() {
    let err = PlainError::new("bad thing", StatusCode::InvalidArguments);
    assert_eq!(err.to_string(), "bad thing");
    assert!(!err.is_retryable());
}

#[test]
fn internal_errors_hide_detail_in_output_msg() {
    let err = PlainError::new("connection to 10.0.0.1:5432 refused", StatusCode::Internal);
    assert_eq!(err.output_msg(), "an internal error occurred");
}

#[test]
fn non_internal_errors_pass_through_output_msg() {
    let err = PlainError::new("missing field 'name'", StatusCode::InvalidArguments);
    assert_eq!(err.output_msg(), "missing field 'name'");
}

#[test]
fn boxed_wraps_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err = PlainError::boxed(io_err, StatusCode::FileNotFound);
    assert!(err.to_string().contains("no such file"));
    assert_eq!(err.status_code(), StatusCode::FileNotFound);
}
