//! Tests for core_kernel error types

use core_kernel::error::CoreError;

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("Unknown currency: XYZ");
    assert!(error.to_string().starts_with("Configuration error"));
}

#[test]
fn test_core_error_keeps_message() {
    match CoreError::configuration("port must be non-zero") {
        CoreError::Configuration(msg) => assert_eq!(msg, "port must be non-zero"),
    }
}
