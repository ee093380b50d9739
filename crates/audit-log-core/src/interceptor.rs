//! The request interceptor and its per-request context.
//!
//! A framework binding owns one [`RequestContext`] per request and calls the
//! three phases in order:
//!
//! 1. [`RequestInterceptor::pre_dispatch`] before the handler runs,
//! 2. [`RequestInterceptor::post_dispatch`] with the outgoing response,
//! 3. [`RequestInterceptor::teardown`] when the request ends, whether or not
//!    a response was produced.
//!
//! ```text
//! NotStarted --pre--> Attached --post--> ResponseRecorded --teardown--> Emitted
//!     |                   |                                               ^
//!     |                   +------------------teardown---------------------+
//!     +--pre (exempt)--> Exempt
//! ```

use std::sync::Arc;

use crate::emitter::Emitter;
use crate::error::AuditError;
use crate::exempt::ExemptionMatcher;
use crate::record::AuditRecord;
use crate::registry::Registry;
use crate::request::{InboundRequest, OutboundResponse};
use crate::settings::AuditLogSettings;
use crate::user::{UserDescriptor, UserResolver};

/// Where a request is in the audit lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditState {
    #[default]
    NotStarted,
    Exempt,
    Attached,
    ResponseRecorded,
    Emitted,
}

/// Per-request slot holding at most one audit record.
#[derive(Debug, Default)]
pub struct RequestContext {
    audit_log: Option<AuditRecord>,
    state: AuditState,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuditState {
        self.state
    }

    pub fn audit_log(&self) -> Option<&AuditRecord> {
        self.audit_log.as_ref()
    }

    pub fn audit_log_mut(&mut self) -> Option<&mut AuditRecord> {
        self.audit_log.as_mut()
    }

    pub fn is_attached(&self) -> bool {
        self.audit_log.is_some()
    }

    /// Attach a record unless one is already present.
    ///
    /// Returns `false`, leaving the existing record untouched, when the
    /// slot is taken.
    pub fn attach(&mut self, record: AuditRecord) -> bool {
        if self.audit_log.is_some() {
            return false;
        }
        self.audit_log = Some(record);
        self.state = AuditState::Attached;
        true
    }
}

/// Drives audit records through the request lifecycle.
///
/// Built once from settings and shared read-only across requests.
pub struct RequestInterceptor {
    settings: AuditLogSettings,
    exemptions: ExemptionMatcher,
    emitter: Emitter,
    user_resolver: Option<Arc<dyn UserResolver>>,
}

impl std::fmt::Debug for RequestInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestInterceptor")
            .field("settings", &self.settings)
            .field("exemptions", &self.exemptions)
            .field("emitter", &self.emitter)
            .field("user_resolver", &self.user_resolver.is_some())
            .finish()
    }
}

impl RequestInterceptor {
    /// Compile exemptions and resolve every configured capability.
    ///
    /// Fails with [`AuditError::Config`] on a bad pattern or an unregistered
    /// handler, formatter or user resolver key.
    pub fn new(settings: AuditLogSettings, registry: &Registry) -> Result<Self, AuditError> {
        let exemptions = ExemptionMatcher::new(&settings.exempt_urls)?;
        let emitter = Emitter::resolve(&settings, registry)?;
        let user_resolver = match settings.user_resolver_path.as_deref() {
            Some(key) if !key.is_empty() => Some(registry.user_resolver(key)?),
            _ => None,
        };

        tracing::debug!(
            logger = %emitter.logger_name(),
            exemptions = exemptions.len(),
            custom_user_resolver = user_resolver.is_some(),
            "audit log interceptor configured"
        );

        Ok(Self {
            settings,
            exemptions,
            emitter,
            user_resolver,
        })
    }

    pub fn settings(&self) -> &AuditLogSettings {
        &self.settings
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exemptions.is_exempt(path)
    }

    /// Create, populate and attach a record for `request`.
    ///
    /// A no-op when the context has already been through this phase or the
    /// path is exempt. A failing user resolver aborts the phase and nothing
    /// is attached.
    pub fn pre_dispatch(
        &self,
        ctx: &mut RequestContext,
        request: &dyn InboundRequest,
    ) -> Result<(), AuditError> {
        if ctx.state != AuditState::NotStarted || ctx.is_attached() {
            return Ok(());
        }

        if self.is_exempt(request.path()) {
            ctx.state = AuditState::Exempt;
            return Ok(());
        }

        let mut record = AuditRecord::new(self.emitter.logger_name());
        record.set_request_from(request);

        let user = self.resolve_user(request)?;
        record.set_user(
            user.authenticated,
            user.provider,
            user.realm,
            user.email,
            user.roles,
            user.ip,
        );

        ctx.attach(record);
        Ok(())
    }

    /// Record the outgoing response on the attached record.
    pub fn post_dispatch(&self, ctx: &mut RequestContext, response: &dyn OutboundResponse) {
        if ctx.state != AuditState::Attached {
            return;
        }
        if let Some(record) = ctx.audit_log.as_mut() {
            record.set_response_from(response);
            ctx.state = AuditState::ResponseRecorded;
        }
    }

    /// Emit the attached record, once.
    ///
    /// `failure` describes why the request did not complete normally, if it
    /// didn't. Emission errors are logged and swallowed so a broken sink
    /// never affects the response.
    pub fn teardown(&self, ctx: &mut RequestContext, failure: Option<&str>) {
        if !matches!(
            ctx.state,
            AuditState::Attached | AuditState::ResponseRecorded
        ) {
            return;
        }
        let Some(record) = ctx.audit_log.as_ref() else {
            return;
        };

        if let Some(failure) = failure {
            tracing::debug!(logger = %record.logger_name, failure, "request failed before audit teardown");
        }

        if let Err(e) = record.emit(&self.emitter) {
            tracing::error!(logger = %record.logger_name, error = %e, "failed to emit audit log");
        }
        ctx.state = AuditState::Emitted;
    }

    fn resolve_user(&self, request: &dyn InboundRequest) -> Result<UserDescriptor, AuditError> {
        let Some(resolver) = self.user_resolver.as_ref() else {
            return Ok(UserDescriptor::anonymous(request));
        };

        resolver.resolve(request).map_err(|e| match e {
            AuditError::UserResolution(_) => e,
            other => AuditError::UserResolution(other.to_string()),
        })
    }
}
