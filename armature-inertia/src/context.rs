//! Request scope
//!
//! Every request handled through the adapter runs inside a scope that owns a
//! [`RequestContext`]: a snapshot of the request properties the protocol needs
//! plus the props shared during that request. The scope is a tokio task-local,
//! so shared state from one request is never visible to another.

use crate::headers::{self, PROTOCOL_REQUEST_HEADERS};
use crate::http::InertiaRequest;
use crate::props::Props;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT_REQUEST: Arc<RequestContext>;
}

/// Per-request state for the Inertia adapter.
#[derive(Debug)]
pub struct RequestContext {
    method: String,
    target: String,
    uri: String,
    headers: Vec<(&'static str, String)>,
    shared: Mutex<Props>,
}

impl RequestContext {
    /// Snapshot a request. Shared props start out empty.
    pub fn from_request<R: InertiaRequest + ?Sized>(request: &R) -> Self {
        let headers = PROTOCOL_REQUEST_HEADERS
            .iter()
            .filter_map(|name| request.header(name).map(|value| (*name, value.to_string())))
            .collect();

        Self {
            method: request.method().to_string(),
            target: request.request_target(),
            uri: request.uri(),
            headers,
            shared: Mutex::new(Props::new()),
        }
    }

    /// Whether the request carries the `X-Inertia` marker.
    pub fn is_inertia(&self) -> bool {
        headers::is_truthy(self.header(headers::X_INERTIA))
    }

    pub(crate) fn share(&self, props: Props) {
        self.shared.lock().merge(props);
    }

    /// Copy of the props shared so far.
    pub fn shared_props(&self) -> Props {
        self.shared.lock().clone()
    }
}

impl InertiaRequest for RequestContext {
    fn method(&self) -> &str {
        &self.method
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn request_target(&self) -> String {
        self.target.clone()
    }

    fn uri(&self) -> String {
        self.uri.clone()
    }
}

/// Run `future` inside a request scope.
pub async fn scope<F: Future>(context: Arc<RequestContext>, future: F) -> F::Output {
    tracing::trace!(
        method = %context.method,
        target = %context.target,
        "Entering Inertia request scope"
    );
    CURRENT_REQUEST.scope(context, future).await
}

/// Run a synchronous closure inside a request scope.
pub fn sync_scope<R>(context: Arc<RequestContext>, f: impl FnOnce() -> R) -> R {
    CURRENT_REQUEST.sync_scope(context, f)
}

/// The request scope of the current task, if any.
pub fn current() -> Option<Arc<RequestContext>> {
    CURRENT_REQUEST.try_with(Arc::clone).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inertia_request() -> http::Request<()> {
        http::Request::builder()
            .method("POST")
            .uri("/users?sort=name")
            .header("Host", "example.com")
            .header("X-Inertia", "true")
            .header("X-Inertia-Version", "v1")
            .header("Accept", "text/html")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_snapshot_captures_protocol_headers() {
        let context = RequestContext::from_request(&inertia_request());

        assert_eq!(context.method(), "POST");
        assert_eq!(context.request_target(), "/users?sort=name");
        assert_eq!(context.uri(), "http://example.com/users?sort=name");
        assert!(context.is_inertia());
        assert_eq!(context.header("x-inertia-version"), Some("v1"));
        assert_eq!(context.header("Accept"), None);
    }

    #[test]
    fn test_no_scope_outside_of_request() {
        assert!(current().is_none());
    }

    #[tokio::test]
    async fn test_scope_exposes_context() {
        let context = Arc::new(RequestContext::from_request(&inertia_request()));

        let method = scope(context, async { current().map(|ctx| ctx.method().to_string()) }).await;
        assert_eq!(method.as_deref(), Some("POST"));
        assert!(current().is_none());
    }

    #[tokio::test]
    async fn test_shared_props_are_isolated_per_scope() {
        let first = Arc::new(RequestContext::from_request(&inertia_request()));
        let second = Arc::new(RequestContext::from_request(&inertia_request()));

        scope(first.clone(), async {
            let props = Props::new().with("user", json!("Bob")).unwrap();
            current().unwrap().share(props);
        })
        .await;

        let keys = scope(second, async {
            current()
                .unwrap()
                .shared_props()
                .keys()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .await;

        assert!(keys.is_empty());
        assert!(first.shared_props().contains_key("user"));
    }
}
