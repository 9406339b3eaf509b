//! Tower middleware wiring for the Inertia protocol
//!
//! ```rust,ignore
//! use armature_inertia::{Inertia, InertiaConfig, HandlebarsRenderer};
//! use tower::ServiceBuilder;
//!
//! let inertia = Inertia::new(InertiaConfig::from_env(), HandlebarsRenderer::builtin()?);
//! let service = ServiceBuilder::new()
//!     .layer(inertia.layer())
//!     .service(app);
//! ```

use crate::context::{self, RequestContext};
use crate::guard::ProtocolGuard;
use http::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Layer that applies [`ProtocolGuard`] and opens a request scope.
#[derive(Debug, Clone)]
pub struct InertiaLayer {
    guard: ProtocolGuard,
}

impl InertiaLayer {
    pub fn new(guard: ProtocolGuard) -> Self {
        Self { guard }
    }
}

impl<S> Layer<S> for InertiaLayer {
    type Service = InertiaService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InertiaService {
            inner,
            guard: self.guard.clone(),
        }
    }
}

/// Service created by [`InertiaLayer`].
#[derive(Debug, Clone)]
pub struct InertiaService<S> {
    inner: S,
    guard: ProtocolGuard,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for InertiaService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ResBody: From<Vec<u8>> + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if let Some(conflict) = self.guard.on_request(&req) {
            return Box::pin(async move { Ok::<_, S::Error>(conflict.into_http::<ResBody>()) });
        }

        let request_context = Arc::new(RequestContext::from_request(&req));
        let guard = self.guard.clone();

        // Use the service that was driven to readiness, leave a clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let future = context::sync_scope(request_context.clone(), move || inner.call(req));

        Box::pin(async move {
            let mut response = context::scope(request_context.clone(), future).await?;
            guard.on_response(request_context.as_ref(), &mut response);
            Ok::<_, S::Error>(response)
        })
    }
}
