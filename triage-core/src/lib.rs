//! triage-core
//!
//! The provider adapter contract shared across the triage ecosystem.
//!
//! - `adapter`: the [`ProviderAdapter`] trait and its request/response types.
//! - Re-exports everything from `triage-types` so downstream crates need a
//!   single import path.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Adapters are async trait objects awaited from the orchestrator's request
//! workflows; implementations are expected to run under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// The `ProviderAdapter` trait and generation wire types.
pub mod adapter;

pub use adapter::{GenerateRequest, GenerateResponse, ProviderAdapter};
pub use triage_types::*;
