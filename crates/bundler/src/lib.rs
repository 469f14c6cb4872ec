//! tandem-bundler: the compilation layer of tandem.
//!
//! One application source tree is compiled twice, once for the browser and
//! once for server-side rendering. This crate provides everything the
//! orchestrator needs to drive that:
//! - [`config`]: the target/mode configuration matrix (`derive_config`)
//! - [`engine`]: the opaque compiler seam (`Engine` / `EngineSession`)
//! - [`bundler`]: the lifecycle adapter unifying one-shot builds, watch
//!   sessions, and externally triggered incremental rebuilds
//! - [`plugin`]: the declarative plugin hook facade
//! - [`cache`]: the typed cache store and the build artifact cache

pub mod bundler;
pub mod cache;
pub mod config;
pub mod engine;
pub mod plugin;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bundler::{Bundler, BundlerError};
pub use cache::{ArtifactCache, ArtifactKind, CacheEntry, CacheError, CacheStore};
pub use config::{
  BuildConfig, BuildMode, BuildTarget, ConfigOptions, EntryPoints, Loader, Platform, derive_config,
};
pub use engine::{BuildMessage, BuildResult, Engine, EngineError, EngineSession, OutputFile};
pub use plugin::{HookFilter, LifecycleHooks, Plugin, PluginError, create_plugin};
