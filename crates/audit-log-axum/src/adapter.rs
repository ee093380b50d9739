//! Core request/response views over axum's `http` types.

use std::net::{IpAddr, SocketAddr};

use audit_log_core::error::AuditError;
use audit_log_core::request::{InboundRequest, OutboundResponse};
use axum::extract::{ConnectInfo, Request};
use axum::http::header::HOST;
use axum::response::Response;

pub struct AxumRequest<'a> {
    inner: &'a Request,
}

impl<'a> AxumRequest<'a> {
    pub fn new(inner: &'a Request) -> Self {
        Self { inner }
    }
}

impl InboundRequest for AxumRequest<'_> {
    fn method(&self) -> &str {
        self.inner.method().as_str()
    }

    /// Servers see origin-form URIs, so scheme and host are rebuilt from the
    /// `Host` header when the URI carries none.
    fn url(&self) -> String {
        let uri = self.inner.uri();
        if uri.scheme().is_some() && uri.authority().is_some() {
            return uri.to_string();
        }

        let host = self
            .inner
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| uri.authority().map(|a| a.as_str()));
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

        match host {
            Some(host) => {
                let scheme = uri.scheme_str().unwrap_or("http");
                format!("{scheme}://{host}{path_and_query}")
            }
            None => path_and_query.to_string(),
        }
    }

    fn path(&self) -> &str {
        self.inner.uri().path()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.inner
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    fn header_values(&self, name: &str) -> Result<Vec<String>, AuditError> {
        self.inner
            .headers()
            .get_all(name)
            .iter()
            .map(|v| {
                v.to_str()
                    .map(str::to_owned)
                    .map_err(|e| AuditError::InvalidHeader {
                        name: name.to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }

    fn remote_addr(&self) -> Option<IpAddr> {
        self.inner
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    }
}

pub struct AxumResponse<'a> {
    inner: &'a Response,
}

impl<'a> AxumResponse<'a> {
    pub fn new(inner: &'a Response) -> Self {
        Self { inner }
    }
}

impl OutboundResponse for AxumResponse<'_> {
    fn status_code(&self) -> Option<u16> {
        Some(self.inner.status().as_u16())
    }

    /// e.g. `404 Not Found`
    fn reason(&self) -> Option<String> {
        Some(self.inner.status().to_string())
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.inner
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }
}
