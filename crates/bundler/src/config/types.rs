use std::collections::BTreeMap;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

/// The runtime environment a build is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
  /// Browser execution: everything bundled, assets emitted.
  Client,
  /// Server-side rendering under Node: module resolution left to the host.
  Server,
}

impl BuildTarget {
  /// Output subdirectory for this target under the cache dir.
  pub fn subdir(&self) -> &'static str {
    match self {
      BuildTarget::Client => "client",
      BuildTarget::Server => "server",
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      BuildTarget::Client => "client",
      BuildTarget::Server => "server",
    }
  }
}

impl std::fmt::Display for BuildTarget {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The build profile controlling optimization and output medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
  Dev,
  Prod,
}

impl BuildMode {
  pub fn is_dev(&self) -> bool {
    matches!(self, BuildMode::Dev)
  }
}

/// Entry points for a build.
///
/// Either an ordered list of paths or a name-to-path mapping. Both forms are
/// carried into [`BuildConfig`] verbatim; the `Named` variant keeps its
/// insertion order, which the engine uses to derive output names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryPoints {
  Paths(Vec<PathBuf>),
  Named(IndexMap<String, PathBuf>),
}

impl EntryPoints {
  pub fn len(&self) -> usize {
    match self {
      EntryPoints::Paths(paths) => paths.len(),
      EntryPoints::Named(map) => map.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl From<Vec<PathBuf>> for EntryPoints {
  fn from(paths: Vec<PathBuf>) -> Self {
    EntryPoints::Paths(paths)
  }
}

impl From<IndexMap<String, PathBuf>> for EntryPoints {
  fn from(map: IndexMap<String, PathBuf>) -> Self {
    EntryPoints::Named(map)
  }
}

/// Platform the output is expected to execute on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  Browser,
  Node,
}

/// How the engine should parse a file matched by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
  Js,
  Jsx,
  Ts,
  Tsx,
  Json,
  Css,
  /// Emit the file to the output directory and resolve the import to its URL.
  File,
  /// Resolve the import but emit nothing. Used for assets in server builds.
  Empty,
}

/// Module format of the emitted code. Only ESM is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
  Esm,
}

/// Whether third-party packages are bundled or left to the host resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageHandling {
  Bundle,
  External,
}

/// Engine log verbosity. The orchestrator owns user-facing reporting, so
/// builds run silent by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  Silent,
  Info,
  Warning,
  Error,
}

/// JSX transformation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsxMode {
  Automatic,
  Preserve,
}

/// Caller-supplied inputs to [`derive_config`](super::derive_config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOptions {
  /// Absolute path to the project root.
  pub working_dir: PathBuf,
  pub entry_points: EntryPoints,
}

/// A fully derived engine configuration for one `(target, mode)` pair.
///
/// Immutable once derived. The mode-specific fields come as a block: dev
/// implies `minify* = false`, `write = false`, `splitting = false`,
/// `metafile = true`; prod implies the opposite of each. The three minify
/// sub-flags are kept independent so callers can assert on each one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfig {
  pub working_dir: PathBuf,
  pub entry_points: EntryPoints,
  /// Output directory; only written to when `write` is set.
  pub outdir: PathBuf,

  pub platform: Platform,
  /// Syntax level the output must run under (`es2022`, `node18`).
  pub syntax_target: Vec<String>,
  /// Extension-to-loader table for this target.
  pub loader: BTreeMap<String, Loader>,
  /// Whether dependencies are resolved into the output.
  pub bundle: bool,
  pub packages: PackageHandling,
  /// Packages excluded from bundling and resolved at runtime instead.
  pub external: Vec<String>,

  pub minify: bool,
  pub minify_whitespace: bool,
  pub minify_identifiers: bool,
  pub minify_syntax: bool,
  /// When false, output stays addressable in memory for the dev server.
  pub write: bool,
  pub splitting: bool,
  /// Dependency-graph metadata for introspection; dev only.
  pub metafile: bool,

  pub format: ModuleFormat,
  pub tree_shaking: bool,
  pub color: bool,
  pub log_level: LogLevel,
  pub jsx: JsxMode,
}
