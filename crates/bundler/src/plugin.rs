//! Declarative plugin hooks.
//!
//! Engines expose an imperative registration API; plugin authors here write
//! a [`LifecycleHooks`] value with optional capability slots instead, and
//! [`create_plugin`] packages it up. Hooks are registered once at plugin
//! creation and immutable afterwards. Absent slots are simply not wired.
//!
//! Filter matching for `on_load` / `on_resolve` is not implemented here:
//! the filter/callback pair is threaded through to the engine's own
//! matching mechanism untouched.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use tandem_core::{Diagnostic, ErrorCategory, ErrorCode};

use crate::config::Loader;
use crate::engine::BuildResult;

pub type StartCallback = Box<dyn Fn() + Send + Sync>;
pub type EndCallback = Box<dyn Fn(&BuildResult) + Send + Sync>;
pub type DisposeCallback = Box<dyn Fn() + Send + Sync>;
/// Returns `None` when the callback does not handle the module, letting the
/// engine fall through to its default loading.
pub type LoadCallback = Box<dyn Fn(&LoadArgs) -> Option<LoadOutcome> + Send + Sync>;
/// Returns `None` when the callback does not handle the import path.
pub type ResolveCallback = Box<dyn Fn(&ResolveArgs) -> Option<ResolveOutcome> + Send + Sync>;

/// Pattern and namespace restricting which modules a load/resolve callback
/// sees. The engine interprets `pattern` with its own matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFilter {
  pub pattern: String,
  pub namespace: Option<String>,
}

impl HookFilter {
  pub fn new(pattern: impl Into<String>) -> Self {
    Self {
      pattern: pattern.into(),
      namespace: None,
    }
  }

  pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
    self.namespace = Some(namespace.into());
    self
  }
}

/// Module the engine is about to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadArgs {
  pub path: PathBuf,
  pub namespace: Option<String>,
}

/// Replacement contents supplied by an `on_load` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
  pub contents: Vec<u8>,
  pub loader: Loader,
}

/// Import path the engine is about to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveArgs {
  pub path: String,
  pub importer: Option<PathBuf>,
  pub namespace: Option<String>,
}

/// Resolution supplied by an `on_resolve` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
  pub path: PathBuf,
  pub namespace: Option<String>,
  /// Marks the module as externalized instead of bundled.
  pub external: bool,
}

/// A filter/callback pair for the engine's matching mechanism.
pub struct FilteredHook<C> {
  pub filter: HookFilter,
  pub callback: C,
}

/// The lifecycle slots a plugin can populate.
///
/// Built with the `with_*` methods; every slot is optional:
///
/// ```
/// use tandem_bundler::plugin::{LifecycleHooks, create_plugin};
///
/// let plugin = create_plugin(
///   "build-logger",
///   LifecycleHooks::new()
///     .with_on_start(|| println!("building..."))
///     .with_on_end(|result| println!("done, {} errors", result.errors.len())),
/// )
/// .unwrap();
/// assert_eq!(plugin.name(), "build-logger");
/// ```
#[derive(Default)]
pub struct LifecycleHooks {
  on_start: Option<StartCallback>,
  on_end: Option<EndCallback>,
  on_dispose: Option<DisposeCallback>,
  on_load: Option<FilteredHook<LoadCallback>>,
  on_resolve: Option<FilteredHook<ResolveCallback>>,
}

impl LifecycleHooks {
  pub fn new() -> Self {
    Self::default()
  }

  /// Invoked at the very beginning of every build or rebuild.
  pub fn with_on_start(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
    self.on_start = Some(Box::new(callback));
    self
  }

  /// Invoked at the end of every build or rebuild with its result.
  pub fn with_on_end(mut self, callback: impl Fn(&BuildResult) + Send + Sync + 'static) -> Self {
    self.on_end = Some(Box::new(callback));
    self
  }

  /// Invoked when the owning session is disposed.
  pub fn with_on_dispose(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
    self.on_dispose = Some(Box::new(callback));
    self
  }

  /// Intercept loading of modules matching `filter`.
  pub fn with_on_load(
    mut self,
    filter: HookFilter,
    callback: impl Fn(&LoadArgs) -> Option<LoadOutcome> + Send + Sync + 'static,
  ) -> Self {
    self.on_load = Some(FilteredHook {
      filter,
      callback: Box::new(callback),
    });
    self
  }

  /// Intercept resolution of import paths matching `filter`.
  pub fn with_on_resolve(
    mut self,
    filter: HookFilter,
    callback: impl Fn(&ResolveArgs) -> Option<ResolveOutcome> + Send + Sync + 'static,
  ) -> Self {
    self.on_resolve = Some(FilteredHook {
      filter,
      callback: Box::new(callback),
    });
    self
  }

  // Dispatch surface for engines. A missing slot is a no-op.

  pub fn notify_start(&self) {
    if let Some(callback) = &self.on_start {
      callback();
    }
  }

  pub fn notify_end(&self, result: &BuildResult) {
    if let Some(callback) = &self.on_end {
      callback(result);
    }
  }

  pub fn notify_dispose(&self) {
    if let Some(callback) = &self.on_dispose {
      callback();
    }
  }

  pub fn load_hook(&self) -> Option<&FilteredHook<LoadCallback>> {
    self.on_load.as_ref()
  }

  pub fn resolve_hook(&self) -> Option<&FilteredHook<ResolveCallback>> {
    self.on_resolve.as_ref()
  }
}

impl fmt::Debug for LifecycleHooks {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LifecycleHooks")
      .field("on_start", &self.on_start.is_some())
      .field("on_end", &self.on_end.is_some())
      .field("on_dispose", &self.on_dispose.is_some())
      .field("on_load", &self.on_load.is_some())
      .field("on_resolve", &self.on_resolve.is_some())
      .finish()
  }
}

/// A named set of lifecycle hooks, ready to hand to the engine.
///
/// Engines run `on_start` / `on_end` hooks of multiple plugins in their own
/// registration order; this layer imposes no ordering beyond the order the
/// plugins were created and added in.
#[derive(Debug)]
pub struct Plugin {
  name: String,
  hooks: LifecycleHooks,
}

impl Plugin {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn hooks(&self) -> &LifecycleHooks {
    &self.hooks
  }
}

/// Errors raised while creating a plugin.
#[derive(Debug, Error)]
pub enum PluginError {
  #[error("plugin name must be a non-empty identifier")]
  InvalidArgument,
}

impl Diagnostic for PluginError {
  fn code(&self) -> ErrorCode {
    match self {
      PluginError::InvalidArgument => ErrorCode::InvalidArgument,
    }
  }

  fn category(&self) -> ErrorCategory {
    ErrorCategory::Validation
  }
}

/// Package a hook set under a plugin name.
///
/// The name is used by the engine for error reporting and debugging and
/// must be non-empty.
pub fn create_plugin(name: impl Into<String>, hooks: LifecycleHooks) -> Result<Plugin, PluginError> {
  let name = name.into();
  if name.trim().is_empty() {
    return Err(PluginError::InvalidArgument);
  }

  Ok(Plugin { name, hooks })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[test]
  fn empty_name_is_rejected() {
    let err = create_plugin("", LifecycleHooks::new()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert_eq!(err.category(), ErrorCategory::Validation);
  }

  #[test]
  fn whitespace_name_is_rejected() {
    assert!(create_plugin("   ", LifecycleHooks::new()).is_err());
  }

  #[test]
  fn plugin_keeps_its_name_and_hooks() {
    let plugin = create_plugin(
      "x",
      LifecycleHooks::new().with_on_start(|| {}).with_on_end(|_| {}),
    )
    .unwrap();

    assert_eq!(plugin.name(), "x");
    assert!(plugin.hooks().load_hook().is_none());
  }

  #[test]
  fn notify_dispatches_to_populated_slots() {
    let starts = Arc::new(AtomicUsize::new(0));
    let ends = Arc::new(AtomicUsize::new(0));
    let disposals = Arc::new(AtomicUsize::new(0));

    let hooks = {
      let starts = starts.clone();
      let ends = ends.clone();
      let disposals = disposals.clone();
      LifecycleHooks::new()
        .with_on_start(move || {
          starts.fetch_add(1, Ordering::SeqCst);
        })
        .with_on_end(move |_| {
          ends.fetch_add(1, Ordering::SeqCst);
        })
        .with_on_dispose(move || {
          disposals.fetch_add(1, Ordering::SeqCst);
        })
    };

    hooks.notify_start();
    hooks.notify_start();
    hooks.notify_end(&BuildResult::default());
    hooks.notify_dispose();

    assert_eq!(starts.load(Ordering::SeqCst), 2);
    assert_eq!(ends.load(Ordering::SeqCst), 1);
    assert_eq!(disposals.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn notify_is_a_noop_for_absent_slots() {
    let hooks = LifecycleHooks::new();
    hooks.notify_start();
    hooks.notify_end(&BuildResult::default());
    hooks.notify_dispose();
  }

  #[test]
  fn load_hook_threads_the_filter_through() {
    let hooks = LifecycleHooks::new().with_on_load(
      HookFilter::new(r"\.virtual$").in_namespace("v-space"),
      |args| {
        Some(LoadOutcome {
          contents: format!("export default {:?};", args.path).into_bytes(),
          loader: Loader::Js,
        })
      },
    );

    let hook = hooks.load_hook().expect("load hook should be registered");
    assert_eq!(hook.filter.pattern, r"\.virtual$");
    assert_eq!(hook.filter.namespace.as_deref(), Some("v-space"));

    let outcome = (hook.callback)(&LoadArgs {
      path: PathBuf::from("config.virtual"),
      namespace: Some("v-space".to_string()),
    });
    assert_eq!(outcome.unwrap().loader, Loader::Js);
  }

  #[test]
  fn resolve_hook_can_decline() {
    let hooks = LifecycleHooks::new().with_on_resolve(HookFilter::new("^app:"), |args| {
      if args.path == "app:config" {
        Some(ResolveOutcome {
          path: PathBuf::from("/generated/config.ts"),
          namespace: None,
          external: false,
        })
      } else {
        None
      }
    });

    let hook = hooks.resolve_hook().unwrap();
    let miss = (hook.callback)(&ResolveArgs {
      path: "app:other".to_string(),
      importer: None,
      namespace: None,
    });
    assert!(miss.is_none());
  }
}
