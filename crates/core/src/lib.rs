//! tandem-core: shared error taxonomy and application configuration.
//!
//! This crate provides the pieces every other tandem crate builds on:
//! - `ErrorCode` / `ErrorCategory`: stable, machine-readable identifiers
//!   attached to every error the build layer raises
//! - `Diagnostic`: the trait errors implement to expose those identifiers
//! - `AppConfig`: the resolved application configuration handed to the
//!   build orchestrator by the config-loading collaborator

mod config;
mod error;

pub use config::{AppConfig, ConfigError, define_config};
pub use error::{Diagnostic, ErrorCategory, ErrorCode, SerializedError, serialize_error};
