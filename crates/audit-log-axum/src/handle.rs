use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use audit_log_core::interceptor::{AuditState, RequestContext};
use audit_log_core::record::AuditRecord;

/// Shared handle to a request's audit context.
///
/// Inserted into request extensions by [`audit_log`](crate::audit_log).
/// Handlers extract it with `Extension<AuditHandle>` to add a message,
/// filter, results or authorization outcome to the record.
#[derive(Debug, Clone, Default)]
pub struct AuditHandle {
    context: Arc<Mutex<RequestContext>>,
}

impl AuditHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the attached record. `None` for exempt requests.
    pub fn with<R>(&self, f: impl FnOnce(&mut AuditRecord) -> R) -> Option<R> {
        self.lock().audit_log_mut().map(f)
    }

    pub fn state(&self) -> AuditState {
        self.lock().state()
    }

    /// A copy of the record as it currently stands.
    pub fn snapshot(&self) -> Option<AuditRecord> {
        self.lock().audit_log().cloned()
    }

    // A panicking handler must not stop teardown from emitting.
    pub(crate) fn lock(&self) -> MutexGuard<'_, RequestContext> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
