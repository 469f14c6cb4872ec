//! The opaque compiler seam.
//!
//! tandem never looks inside the compiler. It requires exactly four
//! capabilities from it: a one-shot build, a persistent session
//! ("context"), incremental rebuilds through that session, and teardown.
//! Everything else, including plugin filter matching and hook invocation,
//! is the engine's responsibility. Plugins handed to [`Engine::build`] /
//! [`Engine::context`] are the registration surface.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::BuildConfig;
use crate::plugin::Plugin;

/// A single artifact produced by a build: a virtual (in-memory) or on-disk
/// file with a path and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
  pub path: PathBuf,
  pub contents: Vec<u8>,
}

impl OutputFile {
  pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
    Self {
      path: path.into(),
      contents: contents.into(),
    }
  }

  /// The contents as text. Binary artifacts come back lossily.
  pub fn text(&self) -> Cow<'_, str> {
    String::from_utf8_lossy(&self.contents)
  }
}

/// A diagnostic the engine attached to a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMessage {
  pub text: String,
  /// Engine-formatted source location, when one applies.
  pub location: Option<String>,
}

impl BuildMessage {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      location: None,
    }
  }
}

/// The outcome of one build or rebuild.
///
/// Ownership transfers to the caller; the adapter keeps only the most
/// recent result and discards superseded ones. `metafile` carries the
/// engine's dependency-graph metadata when the config asked for it; its
/// shape is owned by the engine and treated as opaque JSON here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildResult {
  pub output_files: Vec<OutputFile>,
  pub errors: Vec<BuildMessage>,
  pub warnings: Vec<BuildMessage>,
  pub metafile: Option<serde_json::Value>,
}

impl BuildResult {
  pub fn with_files(output_files: Vec<OutputFile>) -> Self {
    Self {
      output_files,
      ..Self::default()
    }
  }

  pub fn has_errors(&self) -> bool {
    !self.errors.is_empty()
  }
}

/// A failure reported by the underlying engine, with the original cause
/// attached when one exists.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
  message: String,
  #[source]
  source: Option<Box<dyn StdError + Send + Sync>>,
}

impl EngineError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      source: None,
    }
  }

  pub fn with_source(
    message: impl Into<String>,
    source: impl StdError + Send + Sync + 'static,
  ) -> Self {
    Self {
      message: message.into(),
      source: Some(Box::new(source)),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

/// The compiler engine.
///
/// Implementations wrap a real compiler process or library. All operations
/// may perform I/O and must be awaited; none is assumed synchronous.
#[async_trait]
pub trait Engine: Send + Sync {
  type Session: EngineSession;

  /// Run a full one-shot compilation.
  async fn build(
    &self,
    config: &BuildConfig,
    plugins: &[Arc<Plugin>],
  ) -> Result<BuildResult, EngineError>;

  /// Create a persistent session for incremental rebuilds.
  async fn context(
    &self,
    config: &BuildConfig,
    plugins: &[Arc<Plugin>],
  ) -> Result<Self::Session, EngineError>;
}

/// A persistent compiler context kept alive across incremental rebuilds.
///
/// Concurrent `rebuild` calls against one session are undefined behavior in
/// the engine; the [`Bundler`](crate::bundler::Bundler) adapter serializes
/// them before they get here.
#[async_trait]
pub trait EngineSession: Send + Sync {
  /// Recompile incrementally, reusing state from the previous pass.
  async fn rebuild(&self) -> Result<BuildResult, EngineError>;

  /// Activate the engine's native file watcher for this session.
  async fn watch(&self) -> Result<(), EngineError>;

  /// Release the session and all resources it holds.
  async fn dispose(&self) -> Result<(), EngineError>;
}
