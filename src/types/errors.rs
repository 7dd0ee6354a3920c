use thiserror::Error;

// === GatewayError ===

/// Errors returned by remote gateway calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The session credential is missing, invalid or expired.
    #[error("Unauthorized: session credential rejected")]
    Unauthorized,
    /// The service answered with a non-success status.
    #[error("Service error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Service { status: u16, message: Option<String> },
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),
    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Unauthorized)
    }

    /// Message to show the user: the service's own message when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Service {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

// === ValidationError ===

/// Client-detected input problems. Never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The url field is empty.
    #[error("Please enter a URL first")]
    MissingUrl,
    /// The name field is empty after trimming.
    #[error("Name must not be empty")]
    MissingName,
    /// The category field does not hold an integer id.
    #[error("Invalid category id: '{0}'")]
    InvalidCategoryId(String),
}

// === FlowError ===

/// Errors surfaced by mutation flows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The requested transition is not allowed from the flow's current step.
    #[error("Invalid transition for {flow} flow from state {state}")]
    InvalidState { flow: &'static str, state: String },
    /// A delete is already awaiting confirmation or in flight.
    #[error("Another delete is already pending: {0}")]
    DeletePending(String),
}

impl FlowError {
    pub fn invalid_state(flow: &'static str, state: impl std::fmt::Debug) -> Self {
        FlowError::InvalidState {
            flow,
            state: format!("{:?}", state),
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
