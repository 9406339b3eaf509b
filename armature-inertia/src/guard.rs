//! Protocol enforcement at the transport boundary

use crate::headers::{self, X_INERTIA, X_INERTIA_LOCATION, X_INERTIA_VERSION};
use crate::http::{InertiaRequest, InertiaResponse, ResponseParts};
use crate::version::AssetVersion;
use http::StatusCode;
use tracing::{debug, info};

/// Enforces the Inertia negotiation rules around a route handler.
///
/// Before the handler, a stale client (asset version mismatch on an Inertia
/// GET) is answered with `409 Conflict` and an `X-Inertia-Location` header so
/// it performs a full page visit. After the handler, `302` redirects that
/// follow PUT, PATCH or DELETE become `303` so the client follows up with GET.
#[derive(Debug, Clone)]
pub struct ProtocolGuard {
    version: AssetVersion,
}

impl ProtocolGuard {
    pub fn new(version: AssetVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> &AssetVersion {
        &self.version
    }

    /// Pre-handler check; `Some` short-circuits the request.
    pub fn on_request<R: InertiaRequest + ?Sized>(&self, request: &R) -> Option<InertiaResponse> {
        if !is_inertia(request) || !request.method().eq_ignore_ascii_case("GET") {
            return None;
        }

        let client_version = request.header(X_INERTIA_VERSION).unwrap_or("");
        if self.version.matches(client_version) {
            return None;
        }

        let location = request.uri();
        info!(
            client_version,
            server_version = %self.version.current(),
            location = %location,
            "Inertia asset version mismatch, forcing reload"
        );

        Some(
            InertiaResponse::new(StatusCode::CONFLICT.as_u16())
                .with_header(X_INERTIA_LOCATION, location),
        )
    }

    /// Post-handler normalization of redirect status codes.
    pub fn on_response<R, P>(&self, request: &R, response: &mut P)
    where
        R: InertiaRequest + ?Sized,
        P: ResponseParts + ?Sized,
    {
        if !is_inertia(request) {
            return;
        }

        let method = request.method();
        let mutating = ["PUT", "PATCH", "DELETE"]
            .iter()
            .any(|m| method.eq_ignore_ascii_case(m));

        if mutating && response.status() == StatusCode::FOUND.as_u16() {
            debug!(method, "Rewriting 302 redirect to 303 for Inertia request");
            response.set_status(StatusCode::SEE_OTHER.as_u16());
        }
    }
}

fn is_inertia<R: InertiaRequest + ?Sized>(request: &R) -> bool {
    headers::is_truthy(request.header(X_INERTIA))
}
