//! The page object exchanged with the Inertia client

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page description sent to the client.
///
/// Serialized as `{"component", "props", "url", "version"}`, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub component: String,
    pub props: Map<String, Value>,
    pub url: String,
    pub version: String,
}

/// Context handed to the root template: the page under a single `page` slot.
#[derive(Debug, Serialize)]
pub(crate) struct RootTemplateContext<'a> {
    pub page: &'a Page,
}
