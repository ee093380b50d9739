//! The audit record: one structured summary per HTTP transaction.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::emitter::{Emitter, LogEntry};
use crate::error::AuditError;
use crate::request::{InboundRequest, OutboundResponse, USER_AGENT};

/// Logger identity used when none is configured.
pub const DEFAULT_LOGGER_NAME: &str = "audit_log";

/// Severity a record is emitted at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    pub status_code: Option<u16>,
    pub reason: String,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub authenticated: bool,
    pub provider: String,
    pub realm: String,
    pub email: String,
    pub roles: Vec<String>,
    pub ip: Option<String>,
}

/// What a handler searched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub object: String,
    pub fields: String,
    pub terms: String,
}

/// An authorization outcome reported by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authorization {
    pub granted: bool,
    pub grantee: String,
    pub scopes: Vec<String>,
}

/// A mutable audit record for a single request.
///
/// Request and user fields are filled at pre-dispatch, response fields at
/// post-dispatch. Handlers may add a message, filter, results or an
/// authorization outcome while the request is in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    #[serde(rename = "logger")]
    pub logger_name: String,
    #[serde(rename = "type")]
    pub level: LogLevel,
    pub message: String,
    pub http_request: Option<HttpRequest>,
    pub http_response: Option<HttpResponse>,
    pub user: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Authorization>,
}

impl Default for AuditRecord {
    fn default() -> Self {
        Self::new(DEFAULT_LOGGER_NAME)
    }
}

impl AuditRecord {
    pub fn new(logger_name: impl Into<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            level: LogLevel::default(),
            message: String::new(),
            http_request: None,
            http_response: None,
            user: None,
            filter: None,
            results: None,
            authorization: None,
        }
    }

    pub fn set_request(
        &mut self,
        method: impl Into<String>,
        url: impl Into<String>,
        user_agent: impl Into<String>,
    ) {
        self.http_request = Some(HttpRequest {
            method: method.into(),
            url: url.into(),
            user_agent: user_agent.into(),
        });
    }

    /// Copy method, URL and user agent off an inbound request.
    ///
    /// A missing `User-Agent` is recorded as `?`.
    pub fn set_request_from(&mut self, request: &dyn InboundRequest) {
        let user_agent = request
            .header(USER_AGENT)
            .unwrap_or_else(|| "?".to_string());
        self.set_request(request.method(), request.url(), user_agent);
    }

    pub fn set_user(
        &mut self,
        authenticated: bool,
        provider: impl Into<String>,
        realm: impl Into<String>,
        email: impl Into<String>,
        roles: Vec<String>,
        ip: Option<String>,
    ) {
        self.user = Some(UserInfo {
            authenticated,
            provider: provider.into(),
            realm: realm.into(),
            email: email.into(),
            roles,
            ip,
        });
    }

    pub fn set_response(
        &mut self,
        status_code: Option<u16>,
        reason: impl Into<String>,
        headers: impl IntoIterator<Item = (String, String)>,
    ) {
        self.http_response = Some(HttpResponse {
            status_code,
            reason: reason.into(),
            headers: headers.into_iter().collect(),
        });
    }

    /// Record status, reason and every header of an outgoing response.
    pub fn set_response_from(&mut self, response: &dyn OutboundResponse) {
        self.set_response(
            response.status_code(),
            response.reason().unwrap_or_default(),
            response.headers(),
        );
    }

    pub fn set_filter(
        &mut self,
        object: impl Into<String>,
        fields: impl Into<String>,
        terms: impl Into<String>,
    ) {
        self.filter = Some(Filter {
            object: object.into(),
            fields: fields.into(),
            terms: terms.into(),
        });
    }

    pub fn set_results(&mut self, results: Vec<serde_json::Value>) {
        self.results = Some(results);
    }

    pub fn set_authorization(
        &mut self,
        granted: bool,
        grantee: impl Into<String>,
        scopes: Vec<String>,
    ) {
        self.authorization = Some(Authorization {
            granted,
            grantee: grantee.into(),
            scopes,
        });
    }

    pub fn debug(&mut self, message: impl Into<String>) -> &mut Self {
        self.with_level(LogLevel::Debug, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> &mut Self {
        self.with_level(LogLevel::Info, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> &mut Self {
        self.with_level(LogLevel::Warning, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> &mut Self {
        self.with_level(LogLevel::Error, message)
    }

    pub fn critical(&mut self, message: impl Into<String>) -> &mut Self {
        self.with_level(LogLevel::Critical, message)
    }

    fn with_level(&mut self, level: LogLevel, message: impl Into<String>) -> &mut Self {
        self.level = level;
        self.message = message.into();
        self
    }

    /// Render this record with the emitter's formatter and write it through
    /// its handler.
    pub fn emit(&self, emitter: &Emitter) -> Result<(), AuditError> {
        let rendered = emitter.formatter().format(self)?;
        emitter.handler().handle(&LogEntry {
            logger: &self.logger_name,
            level: self.level,
            message: &rendered,
        })
    }
}
