//! audit-log-axum
//!
//! axum binding for the audit log interceptor.
//!
//! ```ignore
//! let interceptor = Arc::new(RequestInterceptor::new(settings, &registry)?);
//! let app = Router::new()
//!     .route("/items", get(list_items))
//!     .layer(axum::middleware::from_fn_with_state(interceptor, audit_log));
//! ```
//!
//! Handlers can enrich the in-flight record through the [`AuditHandle`]
//! request extension.

pub mod adapter;
pub mod handle;
pub mod middleware;

pub use handle::AuditHandle;
pub use middleware::audit_log;
