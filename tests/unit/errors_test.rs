use learnhub::types::errors::*;

// === GatewayError Tests ===

#[test]
fn gateway_error_unauthorized_display() {
    assert_eq!(
        GatewayError::Unauthorized.to_string(),
        "Unauthorized: session credential rejected"
    );
}

#[test]
fn gateway_error_service_display_with_and_without_message() {
    let with_message = GatewayError::Service {
        status: 409,
        message: Some("Email already registered".to_string()),
    };
    assert_eq!(
        with_message.to_string(),
        "Service error (409): Email already registered"
    );

    let without = GatewayError::Service {
        status: 500,
        message: None,
    };
    assert_eq!(without.to_string(), "Service error (500): no message");
}

#[test]
fn gateway_error_network_and_decode_display() {
    assert_eq!(
        GatewayError::Network("connection refused".to_string()).to_string(),
        "Network error: connection refused"
    );
    assert_eq!(
        GatewayError::Decode("missing field `id`".to_string()).to_string(),
        "Decode error: missing field `id`"
    );
}

#[test]
fn gateway_error_is_unauthorized_only_for_unauthorized() {
    assert!(GatewayError::Unauthorized.is_unauthorized());
    assert!(!GatewayError::Network("x".to_string()).is_unauthorized());
    assert!(!GatewayError::Service {
        status: 403,
        message: None
    }
    .is_unauthorized());
}

#[test]
fn gateway_error_user_message_prefers_service_message() {
    let err = GatewayError::Service {
        status: 400,
        message: Some("categoryId is required".to_string()),
    };
    assert_eq!(err.user_message("Failed."), "categoryId is required");
}

#[test]
fn gateway_error_user_message_falls_back() {
    let blank = GatewayError::Service {
        status: 400,
        message: Some("   ".to_string()),
    };
    assert_eq!(blank.user_message("Failed."), "Failed.");
    assert_eq!(
        GatewayError::Network("timeout".to_string()).user_message("Failed."),
        "Failed."
    );
    assert_eq!(GatewayError::Unauthorized.user_message("Failed."), "Failed.");
}

// === ValidationError Tests ===

#[test]
fn validation_error_display_variants() {
    assert_eq!(ValidationError::MissingUrl.to_string(), "Please enter a URL first");
    assert_eq!(ValidationError::MissingName.to_string(), "Name must not be empty");
    assert_eq!(
        ValidationError::InvalidCategoryId("abc".to_string()).to_string(),
        "Invalid category id: 'abc'"
    );
}

// === FlowError Tests ===

#[test]
fn flow_error_wraps_validation() {
    let err: FlowError = ValidationError::MissingUrl.into();
    assert_eq!(err.to_string(), "Validation failed: Please enter a URL first");
}

#[test]
fn flow_error_gateway_is_transparent() {
    let err: FlowError = GatewayError::Unauthorized.into();
    assert_eq!(err.to_string(), GatewayError::Unauthorized.to_string());
}

#[test]
fn flow_error_invalid_state_display() {
    #[derive(Debug)]
    #[allow(dead_code)]
    enum Step {
        Submitting,
    }
    let err = FlowError::invalid_state("bookmark", Step::Submitting);
    assert_eq!(
        err.to_string(),
        "Invalid transition for bookmark flow from state Submitting"
    );
}

#[test]
fn flow_error_delete_pending_display() {
    let err = FlowError::DeletePending("bookmark 3".to_string());
    assert_eq!(err.to_string(), "Another delete is already pending: bookmark 3");
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("disk full".to_string()).to_string(),
        "Settings I/O error: disk full"
    );
    assert_eq!(
        SettingsError::SerializationError("bad json".to_string()).to_string(),
        "Settings serialization error: bad json"
    );
    assert_eq!(
        SettingsError::InvalidKey("nope".to_string()).to_string(),
        "Invalid settings key: nope"
    );
    assert_eq!(
        SettingsError::InvalidValue("wrong type".to_string()).to_string(),
        "Invalid settings value: wrong type"
    );
}

#[test]
fn errors_implement_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(GatewayError::Unauthorized);
    assert!(err.source().is_none());
    let err: Box<dyn std::error::Error> = Box::new(FlowError::from(ValidationError::MissingName));
    assert!(err.source().is_some());
}
