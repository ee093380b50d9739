use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// Environment variable the bundled server reads settings from.
pub const SETTINGS_ENV: &str = "AUDIT_LOG";

/// Audit log settings, read once when the interceptor is built.
///
/// Keys follow the upper-case naming used in application config files.
/// Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogSettings {
    /// Regexes; matching request paths are not audited.
    #[serde(rename = "EXEMPT_URLS", default)]
    pub exempt_urls: Vec<String>,

    #[serde(rename = "LOGGER_NAME", default)]
    pub logger_name: Option<String>,

    /// Registry key of the log handler factory.
    #[serde(rename = "LOG_HANDLER_CALLABLE_PATH", default)]
    pub log_handler_path: Option<String>,

    /// Registry key of the log formatter factory.
    #[serde(rename = "LOG_FORMATTER_CALLABLE_PATH", default)]
    pub log_formatter_path: Option<String>,

    /// Registry key of the user resolver.
    #[serde(rename = "USER_FROM_REQUEST_CALLABLE_PATH", default)]
    pub user_resolver_path: Option<String>,
}

impl AuditLogSettings {
    /// Parse settings from a JSON object. `null` yields the defaults.
    pub fn from_value(value: serde_json::Value) -> Result<Self, AuditError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|e| AuditError::Config(format!("invalid {SETTINGS_ENV} settings: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| AuditError::Config(format!("invalid {SETTINGS_ENV} settings: {e}")))?;
        Self::from_value(value)
    }
}
