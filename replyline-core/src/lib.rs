//! Core shared library for the ReplyLine tooling.
//!
//! This crate exposes the primitives every other crate depends on: the
//! canonical error type, configuration loading, logging setup and the serde
//! helpers used to accept loosely typed numeric input.

pub mod config;
pub mod errors;
pub mod logging;
pub mod serde_utils;

pub use config::{ClientConfig, Platform};
pub use errors::{ConfigError, ReplyLineError, Result as CoreResult};
