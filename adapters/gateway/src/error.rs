use thiserror::Error;

/// Failures while talking to the AI service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The HTTP client could not be constructed.
    #[error("failed to build the AI service client")]
    Client(#[source] reqwest::Error),
    /// The request never produced a response.
    #[error("AI service is unreachable")]
    Unavailable(#[source] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("AI service answered with status {status}")]
    Status {
        /// HTTP status code returned by the service.
        status: u16,
    },
    /// The response body could not be decoded.
    #[error("AI service sent an unreadable response")]
    Malformed(#[source] reqwest::Error),
    /// The plan does not describe a playable wave.
    #[error("AI service proposed an impossible attack (row {attack_row}, wave type {wave_type})")]
    InvalidPlan {
        /// Spawn row received from the service.
        attack_row: i64,
        /// Wave type received from the service.
        wave_type: i64,
    },
}
