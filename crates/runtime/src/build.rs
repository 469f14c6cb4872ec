//! Bundler pair construction and the dual-target build.
//!
//! The bridge between the resolved application configuration and the two
//! live [`Bundler`] instances. Both targets share the same working
//! directory and mode within one run; only the entry point and the derived
//! target policy differ.

use std::path::PathBuf;

use tracing::info;

use tandem_bundler::config::{
  BuildMode, BuildTarget, ConfigOptions, EntryPoints, Platform, derive_config,
};
use tandem_bundler::engine::{BuildResult, Engine};
use tandem_bundler::{ArtifactCache, Bundler};
use tandem_core::AppConfig;

use crate::error::RuntimeError;

/// The results of one dual-target run. Client first, server second, both
/// from the same source tree and mode.
#[derive(Debug, Clone)]
pub struct BuildPair {
  pub client: BuildResult,
  pub server: BuildResult,
}

/// Create the client and server bundlers for one orchestration run.
///
/// Entry points are resolved against `working_dir` (normally the process
/// working directory, passed down by the caller). Both bundlers receive a
/// clone of the same engine handle.
pub fn create_bundlers<E>(
  engine: E,
  config: &AppConfig,
  mode: BuildMode,
  working_dir: impl Into<PathBuf>,
) -> (Bundler<E>, Bundler<E>)
where
  E: Engine + Clone,
{
  let working_dir = working_dir.into();

  let client_config = derive_config(
    BuildTarget::Client,
    mode,
    ConfigOptions {
      working_dir: working_dir.clone(),
      entry_points: EntryPoints::Paths(vec![working_dir.join(config.client_entry())]),
    },
  );

  let server_config = derive_config(
    BuildTarget::Server,
    mode,
    ConfigOptions {
      working_dir: working_dir.clone(),
      entry_points: EntryPoints::Paths(vec![working_dir.join(config.server_entry())]),
    },
  );

  info!(working_dir = %working_dir.display(), mode = ?mode, "created client and server bundlers");

  (
    Bundler::new(engine.clone(), client_config),
    Bundler::new(engine, server_config),
  )
}

/// Build both targets concurrently and return the pair of results.
///
/// The two adapters are independent, so their builds run in flight at the
/// same time; each still serializes its own operations internally. A failed
/// target aborts the run with the target attached. Client output is the
/// caller's to record into the [`ArtifactCache`]; see
/// [`record_client_output`](crate::dev::record_client_output).
pub async fn build_pair<E: Engine>(
  client: &Bundler<E>,
  server: &Bundler<E>,
) -> Result<BuildPair, RuntimeError> {
  info!("building client and server targets");

  let (client_result, server_result) = tokio::join!(client.build(), server.build());

  let client = client_result.map_err(|source| RuntimeError::Build {
    target: BuildTarget::Client,
    source,
  })?;
  let server = server_result.map_err(|source| RuntimeError::Build {
    target: BuildTarget::Server,
    source,
  })?;

  info!(
    client_files = client.output_files.len(),
    server_files = server.output_files.len(),
    "dual-target build complete"
  );

  Ok(BuildPair { client, server })
}

/// Build both targets and record the client output for serving.
///
/// Production entry point: a failed target aborts the run. Dev flows that
/// should survive failures use
/// [`rebuild_and_cache`](crate::dev::rebuild_and_cache) per trigger
/// instead.
pub async fn build_pair_and_cache<E: Engine>(
  client: &Bundler<E>,
  server: &Bundler<E>,
  artifacts: &ArtifactCache,
) -> Result<BuildPair, RuntimeError> {
  let pair = build_pair(client, server).await?;
  artifacts.record(&pair.client.output_files);
  Ok(pair)
}

pub(crate) fn target_of_platform(platform: Platform) -> BuildTarget {
  match platform {
    Platform::Browser => BuildTarget::Client,
    Platform::Node => BuildTarget::Server,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  use tandem_bundler::config::PackageHandling;
  use tandem_bundler::engine::OutputFile;
  use tandem_bundler::testing::MockEngine;
  use tandem_core::{Diagnostic, ErrorCode};

  fn app_config() -> AppConfig {
    AppConfig {
      app_module_path: PathBuf::from("src/app/App.tsx"),
      html_template_path: PathBuf::from("index.html"),
      server_entry_path: None,
      client_entry_path: None,
    }
  }

  #[test]
  fn bundler_pair_follows_target_policy() {
    let (client, server) =
      create_bundlers(MockEngine::new(), &app_config(), BuildMode::Dev, "/project");

    assert!(client.config().bundle);
    assert_eq!(client.config().packages, PackageHandling::Bundle);
    assert!(!server.config().bundle);
    assert!(server.config().external.iter().any(|pkg| pkg == "react"));
  }

  #[test]
  fn bundler_pair_shares_mode_and_working_dir() {
    let (client, server) =
      create_bundlers(MockEngine::new(), &app_config(), BuildMode::Prod, "/project");

    assert_eq!(client.config().working_dir, server.config().working_dir);
    assert_eq!(client.config().minify, server.config().minify);
    assert_eq!(client.config().write, server.config().write);
    assert!(client.config().write);
  }

  #[test]
  fn entry_points_resolve_against_the_working_dir() {
    let (client, _server) =
      create_bundlers(MockEngine::new(), &app_config(), BuildMode::Dev, "/project");

    let EntryPoints::Paths(paths) = &client.config().entry_points else {
      panic!("expected path entry points");
    };
    assert_eq!(paths[0], Path::new("/project/src/app/App.tsx"));
  }

  #[test]
  fn dedicated_entries_override_the_app_module() {
    let mut config = app_config();
    config.client_entry_path = Some(PathBuf::from("src/entry.client.tsx"));

    let (client, server) =
      create_bundlers(MockEngine::new(), &config, BuildMode::Dev, "/project");

    let EntryPoints::Paths(client_paths) = &client.config().entry_points else {
      panic!("expected path entry points");
    };
    let EntryPoints::Paths(server_paths) = &server.config().entry_points else {
      panic!("expected path entry points");
    };
    assert_eq!(client_paths[0], Path::new("/project/src/entry.client.tsx"));
    assert_eq!(server_paths[0], Path::new("/project/src/app/App.tsx"));
  }

  #[tokio::test]
  async fn build_pair_builds_both_targets() {
    let engine = MockEngine::new();
    let (client, server) =
      create_bundlers(engine.clone(), &app_config(), BuildMode::Dev, "/project");

    let pair = build_pair(&client, &server).await.unwrap();

    assert_eq!(engine.build_calls(), 2);
    assert!(pair.client.output_files.is_empty());
    assert!(pair.server.output_files.is_empty());
  }

  #[tokio::test]
  async fn a_failed_target_aborts_with_its_name() {
    let client_engine = MockEngine::new();
    let server_engine = MockEngine::new();
    server_engine.push_result(Err("ssr entry does not resolve"));

    let client = Bundler::new(
      client_engine,
      derive_config(
        BuildTarget::Client,
        BuildMode::Dev,
        ConfigOptions {
          working_dir: PathBuf::from("/project"),
          entry_points: EntryPoints::Paths(vec![PathBuf::from("/project/src/App.tsx")]),
        },
      ),
    );
    let server = Bundler::new(
      server_engine,
      derive_config(
        BuildTarget::Server,
        BuildMode::Dev,
        ConfigOptions {
          working_dir: PathBuf::from("/project"),
          entry_points: EntryPoints::Paths(vec![PathBuf::from("/project/src/App.tsx")]),
        },
      ),
    );

    let err = build_pair(&client, &server).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::BuildFailed);
    match err {
      RuntimeError::Build { target, .. } => assert_eq!(target, BuildTarget::Server),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn build_pair_and_cache_records_client_output() {
    let engine = MockEngine::new();
    engine.push_files(vec![OutputFile::new("app.js", "client code")]);

    let (client, server) =
      create_bundlers(engine.clone(), &app_config(), BuildMode::Dev, "/project");
    let artifacts = ArtifactCache::new();

    // The scripted result goes to whichever target builds first; recording
    // still only ever sees the client result.
    let pair = build_pair_and_cache(&client, &server, &artifacts)
      .await
      .unwrap();

    assert_eq!(artifacts.len(), pair.client.output_files.len());
  }
}
