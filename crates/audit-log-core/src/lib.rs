//! audit-log-core
//!
//! Framework-agnostic HTTP audit logging: the audit record, emitter
//! resolution, user and client address resolution, path exemptions and the
//! request interceptor that drives a record through the request lifecycle.
//! Framework bindings adapt their request/response types to the views in
//! [`request`] and call the three interceptor phases.

pub mod client_ip;
pub mod emitter;
pub mod error;
pub mod exempt;
pub mod interceptor;
pub mod record;
pub mod registry;
pub mod request;
pub mod settings;
pub mod user;

/// Crate version, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
