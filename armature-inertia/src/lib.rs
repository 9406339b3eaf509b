//! Inertia.js protocol adapter for Armature
//!
//! Lets server-side route handlers drive a client-side single-page app
//! without a separate JSON API. A handler names a page component and hands
//! over its props; the adapter answers with a full HTML document on the first
//! visit and with a JSON page object on every Inertia navigation after that.
//!
//! ## Features
//!
//! - 📄 HTML or JSON page responses negotiated from the `X-Inertia` header
//! - 🧩 Per-request shared props merged under the handler's props
//! - ✂️ Partial reloads with deferred props that only run when requested
//! - 🔄 Asset versioning with `409 Conflict` forced reloads
//! - ↪️ `302` to `303` rewriting after PUT, PATCH and DELETE
//! - 🗂️ Task-local request scope, isolated between concurrent requests
//! - 🎨 Handlebars root templates with a built-in `inertia` document
//! - 🗼 Tower layer wiring (`tower` feature)
//!
//! ## Example
//!
//! ```no_run
//! use armature_inertia::{HandlebarsRenderer, Inertia, InertiaConfig, Props};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inertia = Inertia::new(InertiaConfig::from_env(), HandlebarsRenderer::builtin()?);
//!
//! let request = http::Request::builder()
//!     .uri("/users")
//!     .header("X-Inertia", "true")
//!     .body(())?;
//!
//! let response = inertia
//!     .scope(&request, async {
//!         inertia.share("auth", serde_json::json!({"user": "Bob"}))?;
//!
//!         let props = Props::new()
//!             .with("users", vec!["Alice", "Bob"])?
//!             .with_lazy("stats", || 42);
//!         inertia.render("Users/Index", props).await
//!     })
//!     .await?;
//!
//! assert_eq!(response.header("X-Inertia"), Some("true"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Request scope
//!
//! [`Inertia::render`] and the `share` family need to know which request they
//! belong to. Requests that go through [`InertiaLayer`] get a scope
//! automatically; anything else can open one with [`Inertia::scope`]. Calling
//! them outside of a scope fails with [`InertiaError::NoRequestContext`].

pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod headers;
pub mod http;
#[cfg(feature = "tower")]
pub mod layer;
pub mod page;
pub mod props;
mod responder;
pub mod template;
pub mod version;

pub use config::InertiaConfig;
pub use context::RequestContext;
pub use error::{BoxError, InertiaError, Result};
pub use guard::ProtocolGuard;
#[cfg(feature = "tower")]
pub use layer::{InertiaLayer, InertiaService};
pub use page::Page;
pub use props::{DeferredProp, PropValue, Props};
pub use responder::RenderMode;
pub use self::http::{InertiaRequest, InertiaResponse, ResponseParts};
#[cfg(feature = "handlebars")]
pub use template::{HandlebarsConfig, HandlebarsRenderer};
pub use template::{TemplateError, TemplateRenderer};
pub use version::AssetVersion;

use responder::PageResponder;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Inertia adapter service
///
/// Cheap to clone; clones share the asset version and the renderer.
#[derive(Clone)]
pub struct Inertia {
    config: Arc<InertiaConfig>,
    version: AssetVersion,
    renderer: Arc<dyn TemplateRenderer>,
}

impl Inertia {
    /// Create an adapter rendering full page loads with `renderer`.
    pub fn new(config: InertiaConfig, renderer: impl TemplateRenderer + 'static) -> Self {
        Self::with_renderer(config, Arc::new(renderer))
    }

    /// Create an adapter around an already shared renderer.
    pub fn with_renderer(config: InertiaConfig, renderer: Arc<dyn TemplateRenderer>) -> Self {
        info!(
            root_template = %config.root_template,
            version = config.version.as_deref().unwrap_or(""),
            "Initializing Inertia adapter"
        );

        Self {
            version: AssetVersion::new(config.version.clone()),
            config: Arc::new(config),
            renderer,
        }
    }

    /// Render `component` with `props` for the current request.
    ///
    /// Props shared during the request are merged first, so `props` wins on
    /// key collisions. Returns a JSON page for Inertia requests and the root
    /// template otherwise.
    pub async fn render(&self, component: &str, props: Props) -> Result<InertiaResponse> {
        let context = context::current().ok_or(InertiaError::NoRequestContext)?;

        PageResponder {
            context: &context,
            version: &self.version,
            renderer: self.renderer.as_ref(),
            root_template: &self.config.root_template,
        }
        .render(component, props)
        .await
    }

    /// Share a prop with every render for the rest of the current request.
    pub fn share<T: Serialize>(&self, key: impl Into<String>, value: T) -> Result<()> {
        self.share_props(Props::new().with(key, value)?)
    }

    /// Share a deferred prop; its producer runs only if the prop is sent.
    pub fn share_lazy<F, T>(&self, key: impl Into<String>, producer: F) -> Result<()>
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Serialize,
    {
        self.share_props(Props::new().with_lazy(key, producer))
    }

    /// Share several props at once, overriding keys shared earlier.
    pub fn share_props(&self, props: Props) -> Result<()> {
        let context = context::current().ok_or(InertiaError::NoRequestContext)?;
        debug!(keys = ?props.keys().collect::<Vec<_>>(), "Sharing Inertia props");
        context.share(props);
        Ok(())
    }

    /// Keys shared so far in the current request, in insertion order.
    pub fn shared_keys(&self) -> Result<Vec<String>> {
        let context = context::current().ok_or(InertiaError::NoRequestContext)?;
        Ok(context.shared_props().keys().map(str::to_string).collect())
    }

    /// Current asset version, `None` when unversioned.
    pub fn version(&self) -> Option<String> {
        self.version.get()
    }

    /// Override the asset version for every subsequent request.
    pub fn set_version(&self, version: Option<String>) {
        info!(version = version.as_deref().unwrap_or(""), "Inertia asset version changed");
        self.version.set(version);
    }

    pub fn asset_version(&self) -> &AssetVersion {
        &self.version
    }

    /// Guard sharing this adapter's asset version.
    pub fn guard(&self) -> ProtocolGuard {
        ProtocolGuard::new(self.version.clone())
    }

    /// Tower layer applying [`Inertia::guard`] and a request scope.
    #[cfg(feature = "tower")]
    pub fn layer(&self) -> InertiaLayer {
        InertiaLayer::new(self.guard())
    }

    /// Run `future` inside a fresh request scope for `request`.
    pub async fn scope<R, F>(&self, request: &R, future: F) -> F::Output
    where
        R: InertiaRequest + ?Sized,
        F: Future,
    {
        let context = Arc::new(RequestContext::from_request(request));
        context::scope(context, future).await
    }

    pub fn config(&self) -> &InertiaConfig {
        &self.config
    }
}

impl std::fmt::Debug for Inertia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inertia")
            .field("config", &self.config)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
