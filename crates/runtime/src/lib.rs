//! tandem-runtime: the build orchestrator.
//!
//! Sits between the resolved application configuration and the two
//! [`Bundler`](tandem_bundler::Bundler) instances (client + server),
//! driving the dual-target build and feeding results into the build
//! artifact cache:
//! - [`build`]: bundler pair construction and the concurrent dual build
//! - [`dev`]: dev-mode glue, the external-watcher rebuild entry point and
//!   the refresh notification plugin
//! - [`state`]: the process-wide typed state registry
//! - [`fs`]: temp-file persistence for generated entry modules
//! - [`consts`]: well-known paths shared with collaborators

pub mod build;
pub mod consts;
pub mod dev;
mod error;
pub mod fs;
pub mod state;

pub use build::{BuildPair, build_pair, build_pair_and_cache, create_bundlers};
pub use dev::{record_client_output, rebuild_and_cache, refresh_client_plugin};
pub use error::RuntimeError;
pub use fs::save_temp_file;
pub use state::{SharedState, StateKey, StateValue, app_config, html_template, mode};
