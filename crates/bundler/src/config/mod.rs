//! The target/mode configuration matrix.
//!
//! A build configuration is derived from exactly two axes: the target
//! (client or server) and the mode (dev or prod). [`derive_config`] is the
//! single derivation path; there are no hand-written per-pair config
//! literals, so the two axes cannot drift apart.

pub mod loaders;
mod types;

pub use types::*;

use std::collections::BTreeMap;

use loaders::{asset_loaders, base_loaders, no_asset_loaders};

/// Directory (relative to the working dir) holding per-target build output.
pub const CACHE_DIR: &str = ".tandem";

/// UI-framework packages excluded from server bundles so SSR and the host
/// runtime share a single copy of each.
pub const SSR_EXTERNAL_PACKAGES: &[&str] = &["react", "react-dom"];

/// Derive the engine configuration for one `(target, mode)` pair.
///
/// Pure: identical inputs always produce a structurally identical config.
/// Entry points are carried into the result verbatim, in both the list and
/// the named-map form. The default output directory is
/// `<working_dir>/.tandem/<target>`.
///
/// Target policy: client builds run on the browser platform, bundle every
/// dependency, and emit stylesheets and media files. Server builds run on
/// node, leave module resolution to the host runtime, externalize the
/// UI-framework packages, and swap asset loaders for no-op loaders.
///
/// Mode policy: dev disables minification, keeps output in memory, disables
/// splitting, and enables the metafile; prod is the reverse on every flag.
///
/// Invalid `(target, mode)` values are unrepresentable, so this function
/// performs no validation.
pub fn derive_config(target: BuildTarget, mode: BuildMode, options: ConfigOptions) -> BuildConfig {
  let is_dev = mode.is_dev();
  let outdir = options.working_dir.join(CACHE_DIR).join(target.subdir());

  let (platform, syntax_target, loader, bundle, packages, external) = match target {
    BuildTarget::Client => (
      Platform::Browser,
      vec!["es2022".to_string()],
      merged(base_loaders(), asset_loaders()),
      true,
      PackageHandling::Bundle,
      Vec::new(),
    ),
    BuildTarget::Server => (
      Platform::Node,
      vec!["node18".to_string()],
      merged(base_loaders(), no_asset_loaders()),
      false,
      PackageHandling::External,
      SSR_EXTERNAL_PACKAGES.iter().map(|pkg| pkg.to_string()).collect(),
    ),
  };

  BuildConfig {
    working_dir: options.working_dir,
    entry_points: options.entry_points,
    outdir,

    platform,
    syntax_target,
    loader,
    bundle,
    packages,
    external,

    minify: !is_dev,
    minify_whitespace: !is_dev,
    minify_identifiers: !is_dev,
    minify_syntax: !is_dev,
    write: !is_dev,
    splitting: !is_dev,
    metafile: is_dev,

    format: ModuleFormat::Esm,
    tree_shaking: true,
    color: true,
    log_level: LogLevel::Silent,
    jsx: JsxMode::Automatic,
  }
}

fn merged(
  base: BTreeMap<String, Loader>,
  extra: BTreeMap<String, Loader>,
) -> BTreeMap<String, Loader> {
  let mut loader = base;
  loader.extend(extra);
  loader
}
