use serde::{Deserialize, Serialize};

use crate::client_ip::client_ip;
use crate::error::AuditError;
use crate::request::InboundRequest;

/// Who made a request, as reported by a [`UserResolver`].
///
/// Every field is optional on the wire; missing fields fall back to an
/// unauthenticated user with no roles and no address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDescriptor {
    pub authenticated: bool,
    pub provider: String,
    pub realm: String,
    pub email: String,
    pub roles: Vec<String>,
    pub ip: Option<String>,
}

impl UserDescriptor {
    /// Parse a descriptor from a JSON object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, AuditError> {
        serde_json::from_value(value).map_err(|e| AuditError::UserResolution(e.to_string()))
    }

    /// The descriptor used when no resolver is configured: only the client
    /// address is known.
    pub fn anonymous(request: &dyn InboundRequest) -> Self {
        Self {
            ip: Some(client_ip(request)),
            ..Self::default()
        }
    }
}

/// Maps an in-flight request to the user that made it.
///
/// Implemented for any matching closure, so resolvers can be registered as
/// plain functions.
pub trait UserResolver: Send + Sync {
    fn resolve(&self, request: &dyn InboundRequest) -> Result<UserDescriptor, AuditError>;
}

impl<F> UserResolver for F
where
    F: Fn(&dyn InboundRequest) -> Result<UserDescriptor, AuditError> + Send + Sync,
{
    fn resolve(&self, request: &dyn InboundRequest) -> Result<UserDescriptor, AuditError> {
        self(request)
    }
}
