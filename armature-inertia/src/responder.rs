//! Page response negotiation
//!
//! Turns a component name plus props into either a JSON page (Inertia
//! navigation) or a full HTML document (first load). Prop resolution honors
//! partial reloads: when the client targets the component being rendered and
//! lists prop keys, only those keys are resolved and sent.

use crate::context::RequestContext;
use crate::error::{InertiaError, Result};
use crate::headers::{self, CONTENT_TYPE, CONTENT_TYPE_HTML, CONTENT_TYPE_JSON, VARY, X_INERTIA};
use crate::http::{InertiaRequest, InertiaResponse};
use crate::page::{Page, RootTemplateContext};
use crate::props::Props;
use crate::template::TemplateRenderer;
use crate::version::AssetVersion;
use serde_json::{Map, Value};
use tracing::debug;

/// How props are selected for a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderMode {
    /// Resolve and send every prop
    Standard,
    /// Resolve and send only the listed keys
    Partial(Vec<String>),
}

impl RenderMode {
    /// Decide the mode for rendering `component` in response to `request`.
    ///
    /// A partial reload needs `X-Inertia-Partial-Component` equal to
    /// `component` and a non-empty key list in `X-Inertia-Partial-Data`.
    /// Anything else, including an empty key list, is a standard render.
    pub fn for_request<R: InertiaRequest + ?Sized>(request: &R, component: &str) -> Self {
        if request.header(headers::X_INERTIA_PARTIAL_COMPONENT) != Some(component) {
            return RenderMode::Standard;
        }

        let only = request
            .header(headers::X_INERTIA_PARTIAL_DATA)
            .map(headers::parse_partial_data)
            .unwrap_or_default();

        if only.is_empty() {
            RenderMode::Standard
        } else {
            RenderMode::Partial(only)
        }
    }

    pub fn resolve(&self, props: Props) -> Result<Map<String, Value>> {
        match self {
            RenderMode::Standard => props.resolve_all(),
            RenderMode::Partial(only) => props.resolve_only(only),
        }
    }
}

/// Builds Inertia responses for one request.
pub(crate) struct PageResponder<'a> {
    pub context: &'a RequestContext,
    pub version: &'a AssetVersion,
    pub renderer: &'a dyn TemplateRenderer,
    pub root_template: &'a str,
}

impl PageResponder<'_> {
    pub async fn render(&self, component: &str, props: Props) -> Result<InertiaResponse> {
        let mut all_props = self.context.shared_props();
        all_props.merge(props);

        let mode = RenderMode::for_request(self.context, component);
        debug!(
            component,
            partial = matches!(mode, RenderMode::Partial(_)),
            inertia = self.context.is_inertia(),
            "Rendering Inertia page"
        );

        let page = Page {
            component: component.to_string(),
            props: mode.resolve(all_props)?,
            url: self.context.request_target(),
            version: self.version.current(),
        };

        if self.context.is_inertia() {
            return self.json_response(&page);
        }

        self.html_response(&page).await
    }

    fn json_response(&self, page: &Page) -> Result<InertiaResponse> {
        let body = serde_json::to_vec(page)?;

        Ok(InertiaResponse::ok()
            .with_header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_header(X_INERTIA, "true")
            .with_header(VARY, X_INERTIA)
            .with_body(body))
    }

    async fn html_response(&self, page: &Page) -> Result<InertiaResponse> {
        let context = serde_json::to_value(RootTemplateContext { page })?;
        let html = self
            .renderer
            .render(self.root_template, &context)
            .await
            .map_err(InertiaError::Render)?;

        Ok(InertiaResponse::ok()
            .with_header(CONTENT_TYPE, CONTENT_TYPE_HTML)
            .with_body(html.into_bytes()))
    }
}
