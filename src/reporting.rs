use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::BoxError;
use crate::request::RenderPayload;

/// Boxed future returned by [`ReportingService::render`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Output of the remote rendering service.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Status reported by the service.
    pub status: StatusCode,
    /// Media type of `content`, without parameters (e.g. `application/pdf`).
    pub media_type: String,
    /// Response-level headers.
    pub headers: HeaderMap,
    /// Content-level headers such as `content-disposition`.
    pub content_headers: HeaderMap,
    /// The rendered document.
    pub content: Bytes,
}

impl RenderResult {
    /// Creates a `200 OK` result with no headers.
    pub fn new(media_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            media_type: media_type.into(),
            headers: HeaderMap::new(),
            content_headers: HeaderMap::new(),
            content: content.into(),
        }
    }
}

/// Client of the remote rendering service.
///
/// Called at most once per intercepted response. Timeouts and retries, if
/// any, belong to the implementation.
pub trait ReportingService: Send + Sync + 'static {
    /// Renders a payload into a document.
    fn render(&self, payload: RenderPayload) -> BoxFuture<'static, Result<RenderResult, BoxError>>;
}

/// Renders named header and footer templates to markup.
pub trait TemplateRenderer: Send + Sync + 'static {
    /// Renders the template called `name`.
    fn render_template(&self, name: &str) -> Result<String, BoxError>;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str) -> Result<String, BoxError> + Send + Sync + 'static,
{
    fn render_template(&self, name: &str) -> Result<String, BoxError> {
        self(name)
    }
}

/// Template renderer backed by pre-rendered markup keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateMap {
    templates: HashMap<String, String>,
}

impl TemplateMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template.
    pub fn with(mut self, name: impl Into<String>, markup: impl Into<String>) -> Self {
        self.templates.insert(name.into(), markup.into());
        self
    }
}

impl TemplateRenderer for TemplateMap {
    fn render_template(&self, name: &str) -> Result<String, BoxError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| format!("template `{name}` not found").into())
    }
}

/// Template renderer that knows no templates.
///
/// Options that reference a header or footer template fail with this
/// renderer; options without templates are unaffected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl TemplateRenderer for NoTemplates {
    fn render_template(&self, name: &str) -> Result<String, BoxError> {
        Err(format!("no template renderer configured for `{name}`").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_map_lookup() {
        let templates = TemplateMap::new().with("header", "<h1>Report</h1>");
        assert_eq!(
            templates.render_template("header").unwrap(),
            "<h1>Report</h1>"
        );
        assert!(templates.render_template("footer").is_err());
    }

    #[test]
    fn test_closure_renderer() {
        let renderer = |name: &str| -> Result<String, BoxError> { Ok(format!("<{name}/>")) };
        assert_eq!(renderer.render_template("footer").unwrap(), "<footer/>");
    }

    #[test]
    fn test_no_templates_fails() {
        assert!(NoTemplates.render_template("header").is_err());
    }
}
