//! Provisioning helpers shared by cluster health checks.
//!
//! Health checks deploy their workloads in one of two ways: as a helm
//! release ([`helm`]) or as a kubectl-applied manifest expanded from a
//! template ([`manifest`], [`template`]). Every forward action returns a
//! [`cleanup::CleanupAction`] that reverses it; the caller owns the
//! cleanup and decides when (or whether) to run it.
//!
//! All external invocation goes through [`command::run_command`], which is
//! synchronous and unbounded: no retry, no timeout, no cancellation.

pub mod cleanup;
pub mod command;
pub mod config;
pub mod error;
pub mod helm;
pub mod manifest;
pub mod template;

pub use error::{HealthprobeError, Result};
