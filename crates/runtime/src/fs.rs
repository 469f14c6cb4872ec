//! Temp-file persistence for generated modules.
//!
//! Dev mode synthesizes entry modules (hydration shims, SSR wrappers) that
//! must exist on disk for the engine to resolve. They are written under the
//! cache dir with parent directories created on demand.

use std::path::Path;

use tracing::debug;

use crate::error::RuntimeError;

/// Write `contents` to `path`, creating parent directories as needed.
///
/// Collaborator-reported io errors surface unchanged through the error's
/// code: missing paths map to `FILE_NOT_FOUND`, denied writes to
/// `PERMISSION_DENIED`.
pub async fn save_temp_file(path: &Path, contents: &str) -> Result<(), RuntimeError> {
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .map_err(|source| RuntimeError::SaveFile {
        path: path.to_path_buf(),
        source,
      })?;
  }

  tokio::fs::write(path, contents)
    .await
    .map_err(|source| RuntimeError::SaveFile {
      path: path.to_path_buf(),
      source,
    })?;

  debug!(path = %path.display(), bytes = contents.len(), "wrote temp file");
  Ok(())
}
