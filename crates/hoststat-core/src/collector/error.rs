//! Error taxonomy shared by all collectors.

use crate::collector::decode::DecodeError;
use crate::collector::mem::ParseError;

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// A kernel call (sysctl, getfsstat, command execution) failed.
    Syscall(std::io::Error),
    /// A kernel structure could not be decoded.
    Decode(DecodeError),
    /// Text output of a diagnostic command could not be parsed.
    Parse(ParseError),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Syscall(e) => write!(f, "kernel query failed: {}", e),
            CollectError::Decode(e) => write!(f, "decode error: {}", e),
            CollectError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Syscall(e) => Some(e),
            CollectError::Decode(e) => Some(e),
            CollectError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Syscall(e)
    }
}

impl From<DecodeError> for CollectError {
    fn from(e: DecodeError) -> Self {
        CollectError::Decode(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e)
    }
}
