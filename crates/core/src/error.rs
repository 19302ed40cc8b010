//! Structured errors with codes, context and recovery suggestions
//!
//! Every failure the tool can report falls into one of two families:
//! configuration errors (bad project tree, bad config, broken evaluation
//! order) and file-system errors (a directory could not be created or
//! deleted). Both abort the current command.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ErrorCode {
    // General errors (1xxx)
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,
    InvalidPath = 2003,
    DeleteFailed = 2005,
    CreateFailed = 2006,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,
    SettingsParseError = 3004,

    // Layout errors (4xxx)
    LayoutError = 4000,
    EmptyModuleName = 4001,
    DuplicateModule = 4002,
    MissingEvaluationTarget = 4003,
    EvaluationOrderViolation = 4004,
    UnknownModule = 4005,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Layout",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// True for errors raised while building or validating the project
    /// layout, i.e. anything that must stop the configuration pass.
    pub fn is_configuration(&self) -> bool {
        matches!(self.code.code() / 1000, 3 | 4)
    }

    /// True for errors raised by the file system.
    pub fn is_file_system(&self) -> bool {
        self.code.code() / 1000 == 2
    }

    /// Exit code the CLI should terminate with for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_configuration() {
            exit_codes::CONFIG_ERROR
        } else if self.is_file_system() {
            exit_codes::IO_ERROR
        } else {
            exit_codes::FAILURE
        }
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    /// Generic configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// An explicitly requested config file does not exist
    pub fn config_not_found(path: impl AsRef<Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create an .outdir.toml file or drop the --config flag")
    }

    /// A config value that parses but cannot be used
    pub fn config_invalid(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigValidationError,
            format!("Invalid value for {}: {}", field, message.into()),
        )
    }

    /// A Gradle settings script could not be read
    pub fn settings_parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::SettingsParseError,
            format!(
                "Could not read Gradle settings {}: {}",
                path.as_ref().display(),
                message.into()
            ),
        )
    }

    /// A module name is empty
    pub fn empty_module_name() -> Self {
        Self::new(ErrorCode::EmptyModuleName, "Module name must not be empty")
    }

    /// Two modules in one tree share a name
    pub fn duplicate_module(name: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateModule,
            format!("Duplicate module name: {}", name),
        )
        .with_suggestion(
            "Every subproject gets its own directory under the shared build root, \
             so project names must be unique",
        )
    }

    /// The module that must be evaluated first is not in the tree
    pub fn missing_evaluation_target(name: &str) -> Self {
        Self::new(
            ErrorCode::MissingEvaluationTarget,
            format!("Module '{}' must be evaluated first but does not exist", name),
        )
        .with_suggestion(format!(
            "Include ':{}' in the Gradle settings or change [evaluation].first",
            name
        ))
    }

    /// `offender` is scheduled before `first`
    pub fn evaluation_order_violation(first: &str, offender: &str) -> Self {
        Self::new(
            ErrorCode::EvaluationOrderViolation,
            format!(
                "Module '{}' is configured before '{}', which must come first",
                offender, first
            ),
        )
    }

    /// No module with this name
    pub fn unknown_module(name: &str) -> Self {
        Self::new(ErrorCode::UnknownModule, format!("Unknown module: {}", name))
    }

    /// Removing `path` failed
    pub fn delete_failed(path: &Path, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::DeleteFailed,
        };
        Self::new(code, format!("Failed to delete {}: {}", path.display(), err))
            .with_suggestion("Check permissions and that no process holds files open in the build tree")
            .with_source(err)
    }

    /// Creating `path` failed
    pub fn create_failed(path: &Path, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::CreateFailed,
        };
        Self::new(code, format!("Failed to create {}: {}", path.display(), err)).with_source(err)
    }
}

/// Serializable error report for logging and `--json` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Code as `E####`
    pub code_str: String,
    /// Code family, e.g. `Layout`
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Rendered source error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command succeeded
    pub const SUCCESS: i32 = 0;
    /// Any other failure
    pub const FAILURE: i32 = 1;
    /// Configuration or layout error
    pub const CONFIG_ERROR: i32 = 3;
    /// File-system error
    pub const IO_ERROR: i32 = 4;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::Internal, format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error, if any
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
