//! The compilation engine adapter.
//!
//! One [`Bundler`] owns one engine configuration and at most one live
//! engine session, and unifies three ways of running the compiler behind a
//! small state machine:
//!
//! ```text
//! Idle ──build()──▶ Idle            one-shot, no session kept
//! Idle ──watch()──▶ Watching        persistent session created
//! Watching ──rebuild()──▶ Watching  incremental, session reused
//! Watching|Idle ──dispose()──▶ Idle session released, adapter reusable
//! ```
//!
//! There is no terminal disposed state: after `dispose()` the adapter can
//! watch or build again. All mutation goes through a single async mutex,
//! whose FIFO queue is also what serializes overlapping `rebuild()` calls;
//! concurrent rebuilds against one engine session are undefined behavior in
//! the engine and must never reach it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use tandem_core::{Diagnostic, ErrorCategory, ErrorCode};

use crate::config::BuildConfig;
use crate::engine::{BuildResult, Engine, EngineError, EngineSession};
use crate::plugin::Plugin;

/// Errors raised by the adapter. Engine failures are never swallowed: they
/// are wrapped with a stable code/category pair, cause attached, and
/// re-raised. The adapter does not retry.
#[derive(Debug, Error)]
pub enum BundlerError {
  #[error("build failed")]
  BuildFailed {
    #[source]
    source: EngineError,
  },

  #[error("rebuild() requires an active session; call watch() first")]
  NotWatching,
}

impl Diagnostic for BundlerError {
  fn code(&self) -> ErrorCode {
    match self {
      BundlerError::BuildFailed { .. } => ErrorCode::BuildFailed,
      BundlerError::NotWatching => ErrorCode::NotWatching,
    }
  }

  fn category(&self) -> ErrorCategory {
    ErrorCategory::Build
  }
}

enum SessionState<S> {
  Idle,
  Watching { session: S },
}

impl<S> SessionState<S> {
  fn is_watching(&self) -> bool {
    matches!(self, SessionState::Watching { .. })
  }
}

struct Inner<S> {
  state: SessionState<S>,
  last_result: Option<BuildResult>,
}

/// Lifecycle adapter around one compiler session.
///
/// The target is fixed at construction through the [`BuildConfig`]; the
/// orchestrator holds one `Bundler` per target. Two adapters are fully
/// independent and may have builds in flight concurrently; within one
/// adapter, operations complete in the order they were issued.
pub struct Bundler<E: Engine> {
  engine: E,
  config: BuildConfig,
  plugins: Vec<Arc<Plugin>>,
  inner: tokio::sync::Mutex<Inner<E::Session>>,
}

impl<E: Engine> Bundler<E> {
  pub fn new(engine: E, config: BuildConfig) -> Self {
    Self {
      engine,
      config,
      plugins: Vec::new(),
      inner: tokio::sync::Mutex::new(Inner {
        state: SessionState::Idle,
        last_result: None,
      }),
    }
  }

  /// Append a plugin to the configuration.
  ///
  /// Only effective before a build or session has started: the exclusive
  /// receiver means plugins cannot be added once the adapter is shared, and
  /// a session that is already running is never reconfigured.
  pub fn add_plugin(&mut self, plugin: Plugin) -> &mut Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  pub fn plugins(&self) -> &[Arc<Plugin>] {
    &self.plugins
  }

  /// Run a build.
  ///
  /// When watching, this performs an incremental rebuild through the live
  /// session instead of starting a redundant second compilation; otherwise
  /// it is a full one-shot build. The result is recorded as `last_result`
  /// and returned. On failure the previous `last_result` is preserved, so
  /// an observer never loses the last good result to a failed attempt.
  pub async fn build(&self) -> Result<BuildResult, BundlerError> {
    let mut inner = self.inner.lock().await;

    let outcome = match &inner.state {
      SessionState::Watching { session } => {
        debug!(platform = ?self.config.platform, "incremental rebuild through live session");
        session.rebuild().await
      }
      SessionState::Idle => {
        debug!(platform = ?self.config.platform, "one-shot build");
        self.engine.build(&self.config, &self.plugins).await
      }
    };

    match outcome {
      Ok(result) => {
        inner.last_result = Some(result.clone());
        Ok(result)
      }
      Err(source) => Err(BundlerError::BuildFailed { source }),
    }
  }

  /// Start a persistent watch session. Idempotent: calling this while
  /// already watching is a no-op.
  ///
  /// The engine's native watcher is activated as a redundant fallback; the
  /// expected trigger source is an external file-system watcher calling
  /// [`rebuild`](Self::rebuild) directly. The transition to watching only
  /// happens once both the context and the native watcher are up; on
  /// failure the adapter stays idle.
  pub async fn watch(&self) -> Result<(), BundlerError> {
    let mut inner = self.inner.lock().await;

    if inner.state.is_watching() {
      debug!("watch already active");
      return Ok(());
    }

    let session = self
      .engine
      .context(&self.config, &self.plugins)
      .await
      .map_err(|source| BundlerError::BuildFailed { source })?;

    if let Err(source) = session.watch().await {
      if let Err(error) = session.dispose().await {
        warn!(error = %error, "failed to release session after watch error");
      }
      return Err(BundlerError::BuildFailed { source });
    }

    inner.state = SessionState::Watching { session };
    info!(platform = ?self.config.platform, "watch session started");
    Ok(())
  }

  /// Trigger an incremental rebuild; the entry point for external watchers.
  ///
  /// Fails with [`BundlerError::NotWatching`] before [`watch`](Self::watch).
  /// Overlapping calls queue on the adapter's mutex: the second call waits
  /// for the first to complete and then performs its own rebuild. On engine
  /// failure the session stays alive and usable for the next attempt; a
  /// single bad change never forces a watch restart.
  pub async fn rebuild(&self) -> Result<BuildResult, BundlerError> {
    let mut inner = self.inner.lock().await;

    let outcome = match &inner.state {
      SessionState::Watching { session } => session.rebuild().await,
      SessionState::Idle => return Err(BundlerError::NotWatching),
    };

    match outcome {
      Ok(result) => {
        inner.last_result = Some(result.clone());
        Ok(result)
      }
      Err(source) => Err(BundlerError::BuildFailed { source }),
    }
  }

  /// Release the session and its resources.
  ///
  /// Waits for any in-flight operation to settle first; it does not abort a
  /// running compile. Safe to call with no session (no-op). Afterwards
  /// `last_result` is cleared, watching is off, and the adapter can be
  /// reused.
  pub async fn dispose(&self) -> Result<(), BundlerError> {
    let mut inner = self.inner.lock().await;

    match std::mem::replace(&mut inner.state, SessionState::Idle) {
      SessionState::Idle => Ok(()),
      SessionState::Watching { session } => {
        inner.last_result = None;
        info!(platform = ?self.config.platform, "disposing watch session");
        session
          .dispose()
          .await
          .map_err(|source| BundlerError::BuildFailed { source })
      }
    }
  }

  /// The most recent successful build or rebuild, if any.
  pub async fn last_result(&self) -> Option<BuildResult> {
    self.inner.lock().await.last_result.clone()
  }

  pub async fn is_in_watch_mode(&self) -> bool {
    self.inner.lock().await.state.is_watching()
  }
}
