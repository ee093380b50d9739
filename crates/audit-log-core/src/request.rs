//! Read-only views over the hosting framework's request and response.
//!
//! The core never touches a framework type directly. Bindings implement
//! these traits over their own request/response representations.

use std::net::IpAddr;

use crate::error::AuditError;

pub const USER_AGENT: &str = "user-agent";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// An inbound request as seen by the interceptor.
pub trait InboundRequest {
    /// HTTP method, e.g. `GET`.
    fn method(&self) -> &str;

    /// Full request URL including scheme, host and query string.
    fn url(&self) -> String;

    /// Request path without the query string. Matched against exemptions.
    fn path(&self) -> &str;

    /// First value of the named header, if present and valid text.
    fn header(&self, name: &str) -> Option<String>;

    /// Every value of the named header, in order.
    ///
    /// Fails when a value is present but cannot be read as text.
    fn header_values(&self, name: &str) -> Result<Vec<String>, AuditError>;

    /// Transport-level peer address, when the server recorded one.
    fn remote_addr(&self) -> Option<IpAddr>;
}

/// An outgoing response as seen by the interceptor.
///
/// Status and reason are optional so that partial responses can still be
/// recorded.
pub trait OutboundResponse {
    fn status_code(&self) -> Option<u16>;

    fn reason(&self) -> Option<String>;

    /// All header name/value pairs on the response.
    fn headers(&self) -> Vec<(String, String)>;
}
