#![forbid(unsafe_code)]
//! casebook-core library.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types that touch I/O; typed
//!   errors live next to the code that raises them.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod capabilities;
pub mod config;
pub mod error;
pub mod history;
pub mod inspection;
pub mod model;
pub mod parts;
pub mod schedule;
