//! Minimal HTTP capability interface
//!
//! The adapter only needs to read a handful of request properties and to
//! adjust a response's status and headers. [`InertiaRequest`] and
//! [`ResponseParts`] describe exactly that, and are implemented for the `http`
//! crate's `Request`/`Response` as well as for [`InertiaResponse`], the
//! response type produced by [`Inertia::render`](crate::Inertia::render).

use crate::error::Result;
use http::{HeaderName, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Read access to an inbound request.
pub trait InertiaRequest {
    /// HTTP method, e.g. `"GET"`.
    fn method(&self) -> &str;

    /// Header value by name, matched case-insensitively.
    fn header(&self, name: &str) -> Option<&str>;

    /// Path and query string exactly as requested.
    fn request_target(&self) -> String;

    /// Full request URI, including scheme and host when known.
    fn uri(&self) -> String;
}

/// Write access to an outbound response.
pub trait ResponseParts {
    fn status(&self) -> u16;
    fn set_status(&mut self, status: u16);
    fn set_header(&mut self, name: &str, value: &str);
    fn set_body(&mut self, body: Vec<u8>);
}

/// Response produced by the Inertia adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InertiaResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl InertiaResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK.as_u16())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(&name.into(), &value.into());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Header value by name, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as UTF-8 text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Convert into an `http::Response`.
    ///
    /// Headers whose name or value is not valid HTTP are skipped with a warning.
    pub fn into_http<B: From<Vec<u8>>>(self) -> http::Response<B> {
        let mut response = http::Response::new(B::from(self.body));
        *response.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Dropping invalid header from Inertia response"),
            }
        }

        response
    }
}

impl ResponseParts for InertiaResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }
}

impl<B> InertiaRequest for http::Request<B> {
    fn method(&self) -> &str {
        self.method().as_str()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|value| value.to_str().ok())
    }

    fn request_target(&self) -> String {
        self.uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string())
    }

    fn uri(&self) -> String {
        let uri = self.uri();
        if uri.scheme().is_some() && uri.authority().is_some() {
            return uri.to_string();
        }

        let target = InertiaRequest::request_target(self);
        match InertiaRequest::header(self, "Host") {
            Some(host) => {
                let scheme = InertiaRequest::header(self, "X-Forwarded-Proto")
                    .and_then(|proto| proto.split(',').next())
                    .map(str::trim)
                    .filter(|proto| !proto.is_empty())
                    .unwrap_or("http");
                format!("{}://{}{}", scheme, host, target)
            }
            None => target,
        }
    }
}

impl<B: From<Vec<u8>>> ResponseParts for http::Response<B> {
    fn status(&self) -> u16 {
        self.status().as_u16()
    }

    fn set_status(&mut self, status: u16) {
        if let Ok(status) = StatusCode::from_u16(status) {
            *self.status_mut() = status;
        }
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers_mut().insert(name, value);
            }
            _ => warn!(header = %name, "Ignoring invalid response header"),
        }
    }

    fn set_body(&mut self, body: Vec<u8>) {
        *self.body_mut() = B::from(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> http::Request<()> {
        http::Request::builder().uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_request_target_keeps_query() {
        let req = request("/dashboard?tab=stats");
        assert_eq!(req.request_target(), "/dashboard?tab=stats");
    }

    #[test]
    fn test_uri_from_absolute_request() {
        let req = request("https://example.com/users?page=2");
        assert_eq!(InertiaRequest::uri(&req), "https://example.com/users?page=2");
    }

    #[test]
    fn test_uri_from_host_header() {
        let req = http::Request::builder()
            .uri("/users?page=2")
            .header("host", "example.com")
            .body(())
            .unwrap();
        assert_eq!(InertiaRequest::uri(&req), "http://example.com/users?page=2");
    }

    #[test]
    fn test_uri_honors_forwarded_proto() {
        let req = http::Request::builder()
            .uri("/users")
            .header("Host", "example.com")
            .header("X-Forwarded-Proto", "https, http")
            .body(())
            .unwrap();
        assert_eq!(InertiaRequest::uri(&req), "https://example.com/users");
    }

    #[test]
    fn test_uri_without_host_is_target() {
        let req = request("/users");
        assert_eq!(InertiaRequest::uri(&req), "/users");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = http::Request::builder()
            .uri("/")
            .header("x-inertia", "true")
            .body(())
            .unwrap();
        assert_eq!(InertiaRequest::header(&req, "X-Inertia"), Some("true"));
    }

    #[test]
    fn test_response_set_header_replaces() {
        let mut response = InertiaResponse::ok().with_header("Vary", "Accept");
        response.set_header("vary", "X-Inertia");
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.header("VARY"), Some("X-Inertia"));
    }

    #[test]
    fn test_into_http_response() {
        let response = InertiaResponse::new(409)
            .with_header("X-Inertia-Location", "http://example.com/")
            .into_http::<Vec<u8>>();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers().get("x-inertia-location").unwrap(),
            "http://example.com/"
        );
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_http_response_parts() {
        let mut response = http::Response::new(Vec::<u8>::new());
        *response.status_mut() = StatusCode::FOUND;

        ResponseParts::set_status(&mut response, 303);
        ResponseParts::set_body(&mut response, b"moved".to_vec());

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.body(), b"moved");
    }
}
