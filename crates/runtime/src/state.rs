//! Process-wide shared state.
//!
//! A [`CacheStore`] instantiated with a closed key set: the handful of
//! values resolved once during bootstrap (the application config, the HTML
//! template, the run mode) and read everywhere after. `require`-style
//! accessors are the contract: a missing key means bootstrap never ran.

use std::fmt;

use tandem_bundler::CacheStore;
use tandem_bundler::config::BuildMode;
use tandem_core::AppConfig;

use crate::error::RuntimeError;

/// Keys of the shared state registry. Fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
  AppConfig,
  HtmlTemplate,
  Mode,
}

impl fmt::Display for StateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StateKey::AppConfig => f.write_str("app-config"),
      StateKey::HtmlTemplate => f.write_str("html-template"),
      StateKey::Mode => f.write_str("mode"),
    }
  }
}

/// Values stored in the registry; one variant per key.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
  Config(AppConfig),
  Template(String),
  Mode(BuildMode),
}

/// The process-wide registry shared between orchestrator and dev server.
pub type SharedState = CacheStore<StateKey, StateValue>;

/// The application config set during bootstrap.
pub fn app_config(state: &SharedState) -> Result<AppConfig, RuntimeError> {
  match state.require(&StateKey::AppConfig)? {
    StateValue::Config(config) => Ok(config),
    _ => Err(RuntimeError::StateType {
      key: StateKey::AppConfig,
    }),
  }
}

/// The loaded HTML template set during bootstrap.
pub fn html_template(state: &SharedState) -> Result<String, RuntimeError> {
  match state.require(&StateKey::HtmlTemplate)? {
    StateValue::Template(template) => Ok(template),
    _ => Err(RuntimeError::StateType {
      key: StateKey::HtmlTemplate,
    }),
  }
}

/// The mode this run was started in.
pub fn mode(state: &SharedState) -> Result<BuildMode, RuntimeError> {
  match state.require(&StateKey::Mode)? {
    StateValue::Mode(mode) => Ok(mode),
    _ => Err(RuntimeError::StateType { key: StateKey::Mode }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  use tandem_core::{Diagnostic, ErrorCode};

  fn config() -> AppConfig {
    AppConfig {
      app_module_path: PathBuf::from("src/app/App.tsx"),
      html_template_path: PathBuf::from("index.html"),
      server_entry_path: None,
      client_entry_path: None,
    }
  }

  #[test]
  fn missing_bootstrap_key_is_uninitialized() {
    let state = SharedState::new();

    let err = app_config(&state).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UninitializedKey);
    assert!(err.to_string().contains("app-config"));
  }

  #[test]
  fn bootstrap_values_read_back_typed() {
    let state = SharedState::new();
    state.set(StateKey::AppConfig, StateValue::Config(config()));
    state.set(StateKey::HtmlTemplate, StateValue::Template("<html></html>".into()));
    state.set(StateKey::Mode, StateValue::Mode(BuildMode::Dev));

    assert_eq!(app_config(&state).unwrap(), config());
    assert_eq!(html_template(&state).unwrap(), "<html></html>");
    assert_eq!(mode(&state).unwrap(), BuildMode::Dev);
  }

  #[test]
  fn mismatched_value_type_is_rejected() {
    let state = SharedState::new();
    state.set(StateKey::Mode, StateValue::Template("not a mode".into()));

    let err = mode(&state).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidType);
  }

  #[test]
  fn rebinding_a_key_overwrites() {
    let state = SharedState::new();
    state.set(StateKey::Mode, StateValue::Mode(BuildMode::Dev));
    state.set(StateKey::Mode, StateValue::Mode(BuildMode::Prod));

    assert_eq!(mode(&state).unwrap(), BuildMode::Prod);
  }
}
