//!
//! # aedt21 Result and Error Types
//!

// Local Imports
use crate::utils::{self, context_path, ErrorContext};

/// # [AedtError] Result Type
pub type AedtResult<T> = Result<T, AedtError>;

///
/// # aedt21 Error Enumeration
///
/// Misses (`KeyNotFound`, `NotFound`) are routine and often used as existence checks.
/// `MalformedTree` and `External` are generally fatal for the operation at hand.
///
pub enum AedtError {
    /// Key-resolution miss in a [crate::KeyMap]
    KeyNotFound { key: String },
    /// Derived property without a setter
    ReadOnly { key: String },
    /// Malformed engineering-quantity text
    InvalidQuantity(String),
    /// Arithmetic, comparison or conversion across unit categories
    UnitMismatch { from: String, to: String },
    /// Registry lookup miss
    NotFound { kind: String, name: String },
    /// Registry pattern which is not a valid regular expression
    InvalidPattern {
        pattern: String,
        err: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Structurally invalid argument array
    MalformedTree {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Invalid alias table: conflicts or cycles
    Alias(String),
    /// Failure reported by the owning [crate::Context]
    External {
        kind: String,
        name: String,
        message: String,
    },
    /// Boxed External Errors
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// Uncategorized Error, with String Message
    Str(String),
    /// # [crate::utils::Ptr] Locking
    /// Caused by a panic while holding a proxy lock.
    /// The underlying [std::sync::PoisonError] is not forwardable due to lifetime constraints.
    PtrLock,
}
impl AedtError {
    /// Create a [AedtError::Str] from anything String-convertible
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }
    /// Create an error-variant [Result] of our [AedtError::Str] variant from anything String-convertible
    pub fn fail<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Self::msg(s))
    }
    /// Create a [AedtError::KeyNotFound]
    pub fn key(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }
    /// Create a [AedtError::External] failure for entity `name` of `kind`
    pub fn external(
        kind: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::External {
            kind: kind.into(),
            name: name.into(),
            message: message.into(),
        }
    }
    /// Boolean indication of a recoverable miss: either kind of "not found"
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. } | Self::NotFound { .. })
    }
}
impl std::fmt::Debug for AedtError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::KeyNotFound { key } => write!(f, "Key Not Found: {}", key),
            Self::ReadOnly { key } => write!(f, "Read-Only Property: {}", key),
            Self::InvalidQuantity(s) => write!(f, "Invalid Quantity: {:?}", s),
            Self::UnitMismatch { from, to } => {
                write!(f, "Unit Mismatch: {} is not convertible to {}", from, to)
            }
            Self::NotFound { kind, name } => write!(f, "{} Not Found: {}", kind, name),
            Self::InvalidPattern { pattern, err } => {
                write!(f, "Invalid Pattern {:?}: {}", pattern, err)
            }
            Self::MalformedTree { message, stack } => write!(
                f,
                "Malformed Argument Array: \n - {} \n - at: {}",
                message,
                context_path(stack)
            ),
            Self::Alias(s) => write!(f, "Alias Error: {}", s),
            Self::External {
                kind,
                name,
                message,
            } => write!(f, "External System Failure ({} {}): {}", kind, name, message),
            Self::Boxed(err) => write!(f, "{}", err),
            Self::Str(err) => write!(f, "{}", err),
            Self::PtrLock => write!(f, "[std::sync::PoisonError]"),
        }
    }
}
impl std::fmt::Display for AedtError {
    /// Display a [AedtError]
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for AedtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Boxed(e) => Some(&**e),
            Self::InvalidPattern { err, .. } => Some(&**err),
            _ => None,
        }
    }
}

impl From<String> for AedtError {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&str> for AedtError {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
impl From<utils::ser::Error> for AedtError {
    fn from(e: utils::ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::io::Error> for AedtError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<serde_json::Error> for AedtError {
    fn from(e: serde_json::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl<T> From<std::sync::PoisonError<T>> for AedtError {
    fn from(_e: std::sync::PoisonError<T>) -> Self {
        Self::PtrLock
    }
}
