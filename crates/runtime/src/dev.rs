//! Development-mode glue.
//!
//! In dev mode nothing is written to disk: after every successful build or
//! rebuild the client's output files go into the artifact cache, and the
//! dev server serves them from there by base filename. The functions here
//! wire that loop together; the file-system watcher that triggers it is an
//! external collaborator.

use tracing::{error, info, warn};

use tandem_bundler::engine::{BuildResult, Engine};
use tandem_bundler::plugin::LifecycleHooks;
use tandem_bundler::{ArtifactCache, Bundler, Plugin, create_plugin};

use crate::build::target_of_platform;
use crate::error::RuntimeError;

/// Persist a build's output files to the artifact cache for serving.
///
/// Called after every successful build or rebuild in development mode so
/// the dev server always has the most recent code and assets.
pub fn record_client_output(artifacts: &ArtifactCache, result: &BuildResult) {
  artifacts.record(&result.output_files);
}

/// Rebuild one target and cache its output: the entry point an external
/// file-system watcher calls on every change.
///
/// On failure the error is reported and the watch session stays alive, so
/// the next change gets a fresh attempt; a single bad edit never forces a
/// watch restart. The artifact cache is left untouched by failed attempts.
pub async fn rebuild_and_cache<E: Engine>(
  bundler: &Bundler<E>,
  artifacts: &ArtifactCache,
) -> Result<BuildResult, RuntimeError> {
  let target = target_of_platform(bundler.config().platform);

  match bundler.rebuild().await {
    Ok(result) => {
      record_client_output(artifacts, &result);
      info!(build_target = %target, files = result.output_files.len(), "rebuild cached");
      Ok(result)
    }
    Err(source) => {
      warn!(build_target = %target, error = %source, "rebuild failed; session stays alive for the next change");
      Err(RuntimeError::Build { target, source })
    }
  }
}

/// The plugin driving the fast-refresh lifecycle.
///
/// Its `on_end` hook runs after every client (re)build: failed builds are
/// reported and block the refresh; successful ones emit the refresh
/// notification the dev server's transport (WS/SSE) picks up.
pub fn refresh_client_plugin() -> Plugin {
  create_plugin(
    "refresh-client",
    LifecycleHooks::new().with_on_end(|result| {
      if result.has_errors() {
        error!(errors = result.errors.len(), "build failed; fix errors to trigger refresh");
        return;
      }

      info!("build succeeded; triggering client refresh");
    }),
  )
  .expect("plugin name is non-empty")
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  use tandem_bundler::config::{BuildMode, BuildTarget, ConfigOptions, EntryPoints, derive_config};
  use tandem_bundler::engine::{BuildMessage, OutputFile};
  use tandem_bundler::testing::MockEngine;

  fn client_bundler(engine: MockEngine) -> Bundler<MockEngine> {
    Bundler::new(
      engine,
      derive_config(
        BuildTarget::Client,
        BuildMode::Dev,
        ConfigOptions {
          working_dir: PathBuf::from("/project"),
          entry_points: EntryPoints::Paths(vec![PathBuf::from("/project/src/App.tsx")]),
        },
      ),
    )
  }

  #[tokio::test]
  async fn successful_rebuild_is_cached() {
    let engine = MockEngine::new();
    let bundler = client_bundler(engine.clone());
    let artifacts = ArtifactCache::new();

    bundler.watch().await.unwrap();
    engine.push_files(vec![
      OutputFile::new("hydrate.js", "client code"),
      OutputFile::new("styles.css", "body {}"),
    ]);

    rebuild_and_cache(&bundler, &artifacts).await.unwrap();

    assert!(artifacts.get("hydrate.js").is_some());
    assert!(artifacts.get("styles.css").is_some());
  }

  #[tokio::test]
  async fn failed_rebuild_leaves_cache_and_session_intact() {
    let engine = MockEngine::new();
    let bundler = client_bundler(engine.clone());
    let artifacts = ArtifactCache::new();

    bundler.watch().await.unwrap();
    engine.push_result(Err("unexpected token"));

    let err = rebuild_and_cache(&bundler, &artifacts).await.unwrap_err();
    match err {
      RuntimeError::Build { target, .. } => assert_eq!(target, BuildTarget::Client),
      other => panic!("unexpected error: {other}"),
    }

    assert!(artifacts.is_empty());
    assert!(bundler.is_in_watch_mode().await);

    // The next trigger succeeds and records.
    engine.push_files(vec![OutputFile::new("hydrate.js", "fixed")]);
    rebuild_and_cache(&bundler, &artifacts).await.unwrap();
    assert!(artifacts.get("hydrate.js").is_some());
  }

  #[test]
  fn refresh_plugin_registers_only_the_end_hook() {
    let plugin = refresh_client_plugin();

    assert_eq!(plugin.name(), "refresh-client");
    assert!(plugin.hooks().load_hook().is_none());
    assert!(plugin.hooks().resolve_hook().is_none());
  }

  #[test]
  fn refresh_plugin_handles_both_outcomes() {
    let plugin = refresh_client_plugin();

    plugin.hooks().notify_end(&BuildResult::default());

    let mut failed = BuildResult::default();
    failed.errors.push(BuildMessage::new("unexpected token"));
    plugin.hooks().notify_end(&failed);
  }
}
