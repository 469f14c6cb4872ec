//! Stable error codes and categories used across tandem.
//!
//! These are machine-readable and safe to rely on programmatically: the
//! build layer never raises an error without a `(code, category)` pair, so
//! collaborators (dev server, CLI, editors) can branch on them without
//! parsing messages.

use std::error::Error;

use serde::Serialize;

/// Stable error code attached to every tandem error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
  // Validation
  InvalidArgument,
  InvalidType,
  MissingRequiredField,

  // Build / compiler
  BuildFailed,
  CompilationError,
  NotWatching,
  UninitializedKey,

  // Runtime
  RenderFailed,
  HydrationFailed,

  // File system
  FileNotFound,
  PermissionDenied,

  Unknown,
}

impl ErrorCode {
  /// Wire form of the code (`BUILD_FAILED`, ...).
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
      ErrorCode::InvalidType => "INVALID_TYPE",
      ErrorCode::MissingRequiredField => "MISSING_REQUIRED_FIELD",
      ErrorCode::BuildFailed => "BUILD_FAILED",
      ErrorCode::CompilationError => "COMPILATION_ERROR",
      ErrorCode::NotWatching => "NOT_WATCHING",
      ErrorCode::UninitializedKey => "UNINITIALIZED_KEY",
      ErrorCode::RenderFailed => "RENDER_FAILED",
      ErrorCode::HydrationFailed => "HYDRATION_FAILED",
      ErrorCode::FileNotFound => "FILE_NOT_FOUND",
      ErrorCode::PermissionDenied => "PERMISSION_DENIED",
      ErrorCode::Unknown => "UNKNOWN_ERROR",
    }
  }
}

impl std::fmt::Display for ErrorCode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Coarse grouping of error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
  Validation,
  Build,
  Runtime,
  Filesystem,
  Unknown,
}

impl ErrorCategory {
  /// Wire form of the category (`build`, `validation`, ...).
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorCategory::Validation => "validation",
      ErrorCategory::Build => "build",
      ErrorCategory::Runtime => "runtime",
      ErrorCategory::Filesystem => "filesystem",
      ErrorCategory::Unknown => "unknown",
    }
  }
}

impl std::fmt::Display for ErrorCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Errors that carry a stable `(code, category)` pair.
///
/// Every error enum in the tandem crates implements this so callers can
/// branch on codes instead of matching concrete error types across crate
/// boundaries.
pub trait Diagnostic: Error {
  fn code(&self) -> ErrorCode;
  fn category(&self) -> ErrorCategory;
}

/// A serializable snapshot of a [`Diagnostic`] error.
///
/// `cause` renders the `source()` chain outermost-first, one message per
/// link.
#[derive(Debug, Clone, Serialize)]
pub struct SerializedError {
  pub message: String,
  pub code: ErrorCode,
  pub category: ErrorCategory,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub cause: Vec<String>,
}

/// Format a [`Diagnostic`] error for reporting (logs, IPC, dev overlay).
pub fn serialize_error(error: &dyn Diagnostic) -> SerializedError {
  let mut cause = Vec::new();
  let mut source = error.source();
  while let Some(err) = source {
    cause.push(err.to_string());
    source = err.source();
  }

  SerializedError {
    message: error.to_string(),
    code: error.code(),
    category: error.category(),
    cause,
  }
}
