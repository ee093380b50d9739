use audit_log_core::client_ip::client_ip;
use audit_log_core::error::AuditError;
use audit_log_core::request::InboundRequest;
use audit_log_core::user::UserDescriptor;

/// Identity as forwarded by an authenticating reverse proxy.
///
/// `X-Auth-Email` marks the request as authenticated; `X-Auth-Roles` is a
/// comma-separated list.
pub fn from_headers(request: &dyn InboundRequest) -> Result<UserDescriptor, AuditError> {
    let ip = Some(client_ip(request));

    let Some(email) = request.header("x-auth-email") else {
        return Ok(UserDescriptor {
            ip,
            ..UserDescriptor::default()
        });
    };

    let roles = request
        .header("x-auth-roles")
        .map(|roles| {
            roles
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    Ok(UserDescriptor {
        authenticated: true,
        provider: request.header("x-auth-provider").unwrap_or_default(),
        realm: request.header("x-auth-realm").unwrap_or_default(),
        email,
        roles,
        ip,
    })
}
