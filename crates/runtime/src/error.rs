//! Orchestrator errors.

use std::path::PathBuf;

use thiserror::Error;

use tandem_bundler::config::BuildTarget;
use tandem_bundler::{BundlerError, CacheError};
use tandem_core::{Diagnostic, ErrorCategory, ErrorCode};

use crate::state::StateKey;

/// Errors raised while orchestrating builds.
///
/// Bundler errors are carried per target so a caller knows which half of
/// the pair failed; filesystem errors surface the collaborator-reported
/// code unchanged.
#[derive(Debug, Error)]
pub enum RuntimeError {
  #[error("{target} build failed")]
  Build {
    target: BuildTarget,
    #[source]
    source: BundlerError,
  },

  #[error("could not write file {}", path.display())]
  SaveFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  State(#[from] CacheError),

  #[error("state key '{key}' holds a value of an unexpected type")]
  StateType { key: StateKey },
}

impl Diagnostic for RuntimeError {
  fn code(&self) -> ErrorCode {
    match self {
      RuntimeError::Build { source, .. } => source.code(),
      RuntimeError::SaveFile { source, .. } => match source.kind() {
        std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
        std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
        _ => ErrorCode::Unknown,
      },
      RuntimeError::State(source) => source.code(),
      RuntimeError::StateType { .. } => ErrorCode::InvalidType,
    }
  }

  fn category(&self) -> ErrorCategory {
    match self {
      RuntimeError::Build { .. } => ErrorCategory::Build,
      RuntimeError::SaveFile { .. } => ErrorCategory::Filesystem,
      RuntimeError::State(_) | RuntimeError::StateType { .. } => ErrorCategory::Runtime,
    }
  }
}
