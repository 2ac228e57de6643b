//! Remote gateway error types.

use thiserror::Error;

/// A result type using `RemoteError`.
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Errors that can occur talking to the remote device API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response (connect failure, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("remote returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The device list came back empty, so there is no authoritative record.
    #[error("remote returned an empty device list")]
    EmptyDeviceList,

    /// The request payload could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl RemoteError {
    /// Returns true for failures where no usable response arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// Returns true for failures where a response arrived but was unusable.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::EmptyDeviceList)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
