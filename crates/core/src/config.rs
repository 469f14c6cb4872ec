//! Resolved application configuration.
//!
//! Loading and parsing the on-disk config file is the job of an external
//! collaborator; this module only defines the record that collaborator must
//! produce (`serde::Deserialize` is the wire contract) and the validation
//! applied before the orchestrator accepts it.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::{Diagnostic, ErrorCategory, ErrorCode};

/// The application configuration the build orchestrator runs from.
///
/// `app_module_path` is the root application module compiled for both
/// targets. Projects that keep separate server and client entry modules set
/// `server_entry_path` / `client_entry_path` instead; when present they take
/// precedence for their target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
  pub app_module_path: PathBuf,
  pub html_template_path: PathBuf,
  #[serde(default)]
  pub server_entry_path: Option<PathBuf>,
  #[serde(default)]
  pub client_entry_path: Option<PathBuf>,
}

impl AppConfig {
  /// Entry module for the server (SSR) build.
  pub fn server_entry(&self) -> &Path {
    self.server_entry_path.as_deref().unwrap_or(&self.app_module_path)
  }

  /// Entry module for the client (browser) build.
  pub fn client_entry(&self) -> &Path {
    self.client_entry_path.as_deref().unwrap_or(&self.app_module_path)
  }
}

/// Errors raised while validating an application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("{field} is required")]
  MissingRequiredField { field: &'static str },
}

impl Diagnostic for ConfigError {
  fn code(&self) -> ErrorCode {
    match self {
      ConfigError::MissingRequiredField { .. } => ErrorCode::MissingRequiredField,
    }
  }

  fn category(&self) -> ErrorCategory {
    ErrorCategory::Validation
  }
}

/// Validate a deserialized configuration and hand it back.
///
/// The required paths must be non-empty; everything else is optional. The
/// record is returned unchanged so call sites read as a pass-through, the
/// same way the config file itself does.
pub fn define_config(config: AppConfig) -> Result<AppConfig, ConfigError> {
  if config.app_module_path.as_os_str().is_empty() {
    return Err(ConfigError::MissingRequiredField {
      field: "appModulePath",
    });
  }

  if config.html_template_path.as_os_str().is_empty() {
    return Err(ConfigError::MissingRequiredField {
      field: "htmlTemplatePath",
    });
  }

  Ok(config)
}
