use std::sync::Arc;

use audit_log_core::interceptor::RequestInterceptor;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::adapter::{AxumRequest, AxumResponse};
use crate::handle::AuditHandle;

/// Audit logging middleware.
///
/// Attach with `axum::middleware::from_fn_with_state`. Runs pre-dispatch
/// before the inner service, post-dispatch on its response, and teardown
/// from a drop guard so the record is emitted even when the handler panics
/// or the request future is dropped.
pub async fn audit_log(
    State(interceptor): State<Arc<RequestInterceptor>>,
    mut req: Request,
    next: Next,
) -> Response {
    // Already audited by an outer layer.
    if req.extensions().get::<AuditHandle>().is_some() {
        return next.run(req).await;
    }

    let handle = AuditHandle::new();
    let started = interceptor.pre_dispatch(&mut handle.lock(), &AxumRequest::new(&req));
    if let Err(e) = started {
        tracing::error!(
            method = %req.method(),
            path = %req.uri().path(),
            error = %e,
            "audit log pre-dispatch failed"
        );
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    req.extensions_mut().insert(handle.clone());
    let mut guard = TeardownGuard::new(interceptor.clone(), handle.clone());

    let response = next.run(req).await;

    interceptor.post_dispatch(&mut handle.lock(), &AxumResponse::new(&response));
    guard.complete(response.status());
    drop(guard);

    response
}

/// Runs teardown when dropped.
struct TeardownGuard {
    interceptor: Arc<RequestInterceptor>,
    handle: AuditHandle,
    failure: Option<String>,
}

impl TeardownGuard {
    fn new(interceptor: Arc<RequestInterceptor>, handle: AuditHandle) -> Self {
        Self {
            interceptor,
            handle,
            failure: Some("request cancelled before a response was produced".to_string()),
        }
    }

    fn complete(&mut self, status: StatusCode) {
        self.failure = status
            .is_server_error()
            .then(|| format!("handler responded {status}"));
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        let failure = if std::thread::panicking() {
            Some("handler panicked")
        } else {
            self.failure.as_deref()
        };
        self.interceptor.teardown(&mut self.handle.lock(), failure);
    }
}
