use crate::error::AuditError;
use crate::request::{InboundRequest, X_FORWARDED_FOR};

/// Recorded in place of an address when none could be determined.
pub const FAILED_IP: &str = "failed to get ip";

/// Resolve the originating client address of a request.
///
/// Prefers the first entry of `X-Forwarded-For` and falls back to the
/// transport peer address. Any failure is logged as a warning and replaced
/// by [`FAILED_IP`]; this never fails the request.
pub fn client_ip(request: &dyn InboundRequest) -> String {
    match try_client_ip(request) {
        Ok(ip) => ip,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to get ip for audit log");
            FAILED_IP.to_string()
        }
    }
}

fn try_client_ip(request: &dyn InboundRequest) -> Result<String, AuditError> {
    let forwarded = request.header_values(X_FORWARDED_FOR)?;

    // Proxies append, so the originating client is the first entry.
    let first = forwarded
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .find(|entry| !entry.is_empty());

    if let Some(ip) = first {
        return Ok(ip.to_string());
    }

    request
        .remote_addr()
        .map(|addr| addr.to_string())
        .ok_or_else(|| AuditError::AddressResolution("no peer address on request".to_string()))
}
