//! Error types for the Inertia adapter

use thiserror::Error;

/// Boxed error returned by template renderers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for Inertia operations
pub type Result<T> = std::result::Result<T, InertiaError>;

/// Errors that can occur while producing an Inertia response
#[derive(Error, Debug)]
pub enum InertiaError {
    /// `render` or `share` was called outside of a request scope
    #[error("Cannot render an Inertia response outside of a request context")]
    NoRequestContext,

    /// A prop value could not be serialized to JSON
    #[error("Failed to encode Inertia page: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The root template renderer failed
    #[error("Root template rendering failed: {0}")]
    Render(#[source] BoxError),
}

impl InertiaError {
    /// Wrap a template renderer error, keeping it as the error source.
    pub fn render(err: impl Into<BoxError>) -> Self {
        InertiaError::Render(err.into())
    }

    /// Whether this is the missing request scope usage error.
    pub fn is_no_request_context(&self) -> bool {
        matches!(self, InertiaError::NoRequestContext)
    }
}
