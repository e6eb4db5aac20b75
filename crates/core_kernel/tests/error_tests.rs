//! Tests for the domain error taxonomy

use core_kernel::{DomainError, PortError};

#[test]
fn test_not_found_display_names_entity() {
    let error = DomainError::not_found("customer");
    assert_eq!(error.to_string(), "customer not found");
    assert!(error.is_not_found());
}

#[test]
fn test_conflict_constructor() {
    let error = DomainError::conflict("duplicate active policy");

    match &error {
        DomainError::Conflict(msg) => assert_eq!(msg, "duplicate active policy"),
        _ => panic!("Expected Conflict error"),
    }
    assert!(error.is_conflict());
}

#[test]
fn test_validation_display() {
    let error = DomainError::validation("customer must be at least 18 years old");
    assert!(error.to_string().contains("Validation error"));
}

#[test]
fn test_storage_wraps_port_error_as_internal() {
    let port_error = PortError::connection("connection refused");
    let error = DomainError::storage("checking existing policy", port_error);

    match error {
        DomainError::Internal(msg) => {
            assert!(msg.starts_with("checking existing policy"));
            assert!(msg.contains("connection refused"));
        }
        _ => panic!("Expected Internal error"),
    }
}
