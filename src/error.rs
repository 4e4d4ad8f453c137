use thiserror::Error;

/// Boxed error type used at collaborator boundaries and as the service error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while turning a captured response into a rendered document.
///
/// Every variant aborts the response: the captured HTML is never sent in
/// place of the document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The wrapped response body failed while it was being captured.
    #[error("failed to read response body: {0}")]
    Body(#[source] BoxError),

    /// A configured header or footer template failed to render.
    #[error("failed to render template `{name}`: {source}")]
    Template {
        /// Template name as configured in the render options.
        name: String,
        /// Error reported by the template renderer.
        #[source]
        source: BoxError,
    },

    /// The remote rendering service failed.
    #[error("remote rendering failed: {0}")]
    Remote(#[source] BoxError),

    /// A header returned by the service (or configured) is not a valid header.
    #[error("invalid header `{name}` in render result")]
    InvalidHeader {
        /// Header name.
        name: String,
    },

    /// The media type returned by the service is not a valid header value.
    #[error("invalid media type `{0}` in render result")]
    InvalidMediaType(String),
}
