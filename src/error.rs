//! Global error handling for filescopier
//!
//! Per-file read failures never surface here: they are turned into placeholder
//! fragments by the formatter. This type covers configuration problems and
//! failed deliveries.

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for filescopier operations
#[derive(Error, Debug)]
pub enum FilesCopierError {
    /// Clipboard-related errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Delivery to a sink failed
    #[error("Sink error: {0}")]
    Sink(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for filescopier operations
pub type Result<T> = std::result::Result<T, FilesCopierError>;

/// Creates a FilesCopierError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::FilesCopierError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Lets the binary return io::Result from main
impl From<FilesCopierError> for io::Error {
    fn from(err: FilesCopierError) -> Self {
        match err {
            FilesCopierError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
