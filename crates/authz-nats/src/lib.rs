#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for connection setup and state changes.
pub const TRACING_TARGET_CONNECTION: &str = "authz_nats::connection";

/// Tracing target for JetStream stream and publish operations.
pub const TRACING_TARGET_STREAM: &str = "authz_nats::stream";

pub mod audit;
mod client;
mod error;

pub use client::{NatsClient, NatsConfig};
pub use error::{Error, Result};
