//! Root template rendering
//!
//! Full page loads hand the page object to a [`TemplateRenderer`], which turns
//! it into an HTML document. The adapter treats the renderer as a black box
//! and passes its errors through untouched.

#[cfg(feature = "handlebars")]
mod engine;
#[cfg(feature = "handlebars")]
pub mod helpers;

#[cfg(feature = "handlebars")]
pub use engine::{HandlebarsConfig, HandlebarsRenderer};

use crate::error::BoxError;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Renders a named template with a JSON context.
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    async fn render(&self, template: &str, context: &Value) -> Result<String, BoxError>;
}

/// Errors raised by the bundled template renderer
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template not found
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Template rendering error
    #[error("Template rendering error: {0}")]
    Render(String),

    /// Template parsing error
    #[error("Template parsing error: {0}")]
    Parse(String),

    /// IO error when loading templates
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
