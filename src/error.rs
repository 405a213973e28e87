//! Failures that the portal reports through otherwise successful responses.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    /// The provider has blocked the account or the address, do not retry.
    #[error("access denied: the provider has blocked this account or address")]
    AccessDenied,

    #[error("authentication failed: invalid login or password")]
    AuthenticationFailed,

    /// Unexpected record shape or unparsable field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl PortalError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}
