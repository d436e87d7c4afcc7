//! # Error Handling
//!
//! Error types for the barcode scanner, with error classification traits and
//! rich error context.
//!
//! ## Error Classification
//!
//! The capture loop isolates faults per iteration. Whether an error ends the
//! loop is decided by [`classify::is_fatal`]:
//!
//! - **Recovered locally**: store corruption on load (handled inside the store)
//! - **Per-frame faults**: frame reads, decoding, drawing, display. Logged and
//!   skipped
//! - **Fatal**: invalid configuration, persistence write failures and operator
//!   input failures
//!
//! ## Usage
//!
//! ```rust
//! use barcode_scanner::error::{classify, HasRecoverySuggestion, Recoverable, ScanError};
//!
//! let error = ScanError::frame_read("stream closed")
//!     .with_operation("read frame")
//!     .with_recovery_suggestion("Check that the camera app is still running");
//!
//! assert!(error.is_recoverable());
//! assert!(!classify::is_fatal(&error));
//! assert_eq!(
//!     error.recovery_suggestion(),
//!     Some("Check that the camera app is still running")
//! );
//! ```

use std::{collections::HashMap, error::Error as StdError, fmt};

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Errors that affect operation but can be recovered from
    Error,
    /// Fatal errors that cannot be recovered from
    Fatal,
}

/// Where an error occurred and what the operator can do about it
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            operation: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            metadata: HashMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Base error type for the barcode scanner
#[derive(Debug)]
pub enum ScanError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// A video source could not be opened
    SourceOpen {
        source_name: String,
        reason: String,
        context: ErrorContext,
    },
    /// Reading a frame from an open source failed
    FrameRead {
        reason: String,
        context: ErrorContext,
    },
    /// Barcode decoder failures
    Decode {
        reason: String,
        context: ErrorContext,
    },
    /// Display surface failures
    Display {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// Product store encoding/decoding errors
    Store {
        path: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Operator input could not be read
    Input {
        prompt: String,
        reason: String,
        context: ErrorContext,
    },
    /// Frame processing errors (scaling, drawing)
    Processing {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// External library errors
    External {
        library: String,
        source: Box<dyn StdError + Send + Sync>,
        context: ErrorContext,
    },
}

impl ScanError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Create a source open error
    pub fn source_open(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceOpen {
            source_name: source_name.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a frame read error
    pub fn frame_read(reason: impl Into<String>) -> Self {
        Self::FrameRead {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a decoder error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a display error
    pub fn display(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Display {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a store format error
    pub fn store(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Store {
            path: path.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error on a specific file
    pub fn io_at(
        operation: impl Into<String>,
        path: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: Some(path.into()),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an operator input error. Input errors end the session.
    pub fn input(prompt: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Input {
            prompt: prompt.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Create a processing error
    pub fn processing(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Processing {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an external library error
    pub fn external(
        library: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            library: library.into(),
            source: Box::new(source),
            context: ErrorContext::new(),
        }
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Set severity
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::SourceOpen { context, .. } => context,
            Self::FrameRead { context, .. } => context,
            Self::Decode { context, .. } => context,
            Self::Display { context, .. } => context,
            Self::Store { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Input { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::External { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::SourceOpen { context, .. } => context,
            Self::FrameRead { context, .. } => context,
            Self::Decode { context, .. } => context,
            Self::Display { context, .. } => context,
            Self::Store { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Input { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::External { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::SourceOpen { .. } => "source_open",
            Self::FrameRead { .. } => "frame_read",
            Self::Decode { .. } => "decode",
            Self::Display { .. } => "display",
            Self::Store { .. } => "store",
            Self::Io { .. } => "io",
            Self::Input { .. } => "input",
            Self::Processing { .. } => "processing",
            Self::External { .. } => "external",
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Config { field, value, reason, .. } => {
                write!(f, "Configuration error in '{}': {} (value: {})", field, reason, value)
            }
            ScanError::SourceOpen { source_name, reason, .. } => {
                write!(f, "Failed to open video source {}: {}", source_name, reason)
            }
            ScanError::FrameRead { reason, .. } => write!(f, "Frame read failed: {}", reason),
            ScanError::Decode { reason, .. } => write!(f, "Barcode decoding failed: {}", reason),
            ScanError::Display { operation, reason, .. } => {
                write!(f, "Display failed during {}: {}", operation, reason)
            }
            ScanError::Store { path, reason, .. } => {
                write!(f, "Product store '{}' is unreadable: {}", path, reason)
            }
            ScanError::Io { operation, path: Some(path), source, .. } => {
                write!(f, "I/O error during {} on '{}': {}", operation, path, source)
            }
            ScanError::Io { operation, source, .. } => {
                write!(f, "I/O error during {}: {}", operation, source)
            }
            ScanError::Input { prompt, reason, .. } => {
                write!(f, "Could not read answer to '{}': {}", prompt, reason)
            }
            ScanError::Processing { operation, reason, .. } => {
                write!(f, "Processing failed during {}: {}", operation, reason)
            }
            ScanError::External { library, source, .. } => {
                write!(f, "External library error in {}: {}", library, source)
            }
        }
    }
}

impl StdError for ScanError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::External { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type ScanResult<T> = Result<T, ScanError>;

/// Trait for errors that can be recovered from
pub trait Recoverable {
    /// Check if this error can be recovered from
    fn is_recoverable(&self) -> bool;
}

impl Recoverable for ScanError {
    fn is_recoverable(&self) -> bool {
        self.context().severity < ErrorSeverity::Fatal
    }
}

/// Trait for errors with severity levels
pub trait HasSeverity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for ScanError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for ScanError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Check if an error must stop the capture loop
    pub fn is_fatal(error: &ScanError) -> bool {
        !error.is_recoverable()
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(error: serde_json::Error) -> Self {
        Self::external("serde_json", error)
    }
}

impl From<scan_scale::cpu::ScaleError> for ScanError {
    fn from(error: scan_scale::cpu::ScaleError) -> Self {
        Self::processing("resize", error.to_string())
    }
}
