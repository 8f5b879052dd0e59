//! # PortInspector Common
//!
//! Shared vocabulary of the workspace: the device model, configuration,
//! errors and the session traits that the discovery pipeline drives.
//!
//! * **[`network`]**: Device records and their report form.
//! * **[`session`]**: The remote command execution boundary.
//! * **[`config`]**: Switch, credential and runtime configuration.
//! * **[`utils`]**: Retry policy and helpers.

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod network;
pub mod session;
pub mod utils;

#[doc(hidden)]
pub use tracing;
