//! The build artifact cache.
//!
//! After each (re)build the orchestrator records the output files here;
//! the dev server serves them back by base filename. Keys are base
//! filenames only (directory-insensitive), so a later build's `main.js`
//! always overwrites an earlier one: last write wins, no versioning.
//!
//! The cache holds exactly the most recent build's output set. There is no
//! eviction and no capacity bound, and entries for source files deleted
//! between builds are not purged automatically; callers that need a fresh
//! set call [`ArtifactCache::clear`] before recording.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::store::CacheStore;
use crate::engine::OutputFile;

/// Classification of a compiled output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
  /// Executable or style code (`.js`, `.css`).
  Bundle,
  /// Everything else: images, fonts, and other emitted files.
  Asset,
}

/// A cached artifact: contents plus classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
  pub contents: Arc<[u8]>,
  pub kind: ArtifactKind,
}

impl CacheEntry {
  /// The contents as text, for serving bundles.
  pub fn text(&self) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(&self.contents)
  }
}

/// Indexes compiled output files by base filename.
#[derive(Default)]
pub struct ArtifactCache {
  store: CacheStore<String, CacheEntry>,
}

impl ArtifactCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a build's output files, overwriting prior entries that share a
  /// base name.
  pub fn record(&self, output_files: &[OutputFile]) {
    for file in output_files {
      let Some(name) = file.path.file_name().and_then(|name| name.to_str()) else {
        warn!(path = %file.path.display(), "skipping output file without a usable base name");
        continue;
      };

      let kind = classify(name);
      debug!(key = name, kind = ?kind, bytes = file.contents.len(), "caching build output");

      self.store.set(
        name.to_string(),
        CacheEntry {
          contents: Arc::from(file.contents.as_slice()),
          kind,
        },
      );
    }
  }

  /// Look up an artifact by base filename. The serving contract for the
  /// dev server.
  pub fn get(&self, basename: &str) -> Option<CacheEntry> {
    self.store.get(basename)
  }

  /// Drop every cached artifact.
  pub fn clear(&self) {
    self.store.clear();
  }

  pub fn len(&self) -> usize {
    self.store.len()
  }

  pub fn is_empty(&self) -> bool {
    self.store.is_empty()
  }
}

fn classify(name: &str) -> ArtifactKind {
  match Path::new(name).extension().and_then(|ext| ext.to_str()) {
    Some("js") | Some("css") => ArtifactKind::Bundle,
    _ => ArtifactKind::Asset,
  }
}
