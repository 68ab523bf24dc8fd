//! Error handling - bridge error hierarchy and the numeric return-code contract

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Orderbridge error hierarchy
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Unrecognized command token
    #[error("invalid command")]
    InvalidCommand,

    /// Missing or malformed required field, out-of-range number
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// No usable adapter or worker
    #[error("not connected")]
    NotConnected,

    /// Unexpected fault surfacing inside dispatch
    #[error("internal error: {0}")]
    Internal(String),

    /// Configuration unreadable or malformed
    #[error("config: {0}")]
    Config(String),

    /// Worker round trip failed or worker rejected the request
    #[error("adapter: {0}")]
    Adapter(String),
}

impl BridgeError {
    /// Map onto the stable numeric contract shared with the host platform.
    pub fn code(&self) -> ReturnCode {
        match self {
            BridgeError::InvalidCommand => ReturnCode::InvalidCommand,
            BridgeError::InvalidParam(_) => ReturnCode::InvalidParam,
            BridgeError::NotConnected => ReturnCode::NotConnected,
            BridgeError::Internal(_) => ReturnCode::InternalError,
            BridgeError::Config(_) => ReturnCode::ConfigError,
            BridgeError::Adapter(_) => ReturnCode::InternalError,
        }
    }
}

/// Return codes exposed to callers across all layers.
///
/// The numeric values are a stable contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ReturnCode {
    Success = 0,
    InvalidCommand = -1,
    InvalidParam = -2,
    NotConnected = -3,
    InternalError = -4,
    ConfigError = -6,
}

impl ReturnCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Collapse a bridge result into the caller-facing code.
    pub fn from_result<T>(res: &Result<T>) -> Self {
        match res {
            Ok(_) => ReturnCode::Success,
            Err(e) => e.code(),
        }
    }
}

impl std::fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}
