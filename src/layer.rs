use crate::options::RenderOptions;
use crate::reporting::{NoTemplates, ReportingService, TemplateRenderer};
use crate::service::{RenderService, Shared};
use std::fmt;
use std::sync::Arc;
use tower::Layer;

/// A Tower layer that renders HTML responses through a rendering service.
///
/// The layer stands for the route group it wraps: options set with
/// [`RenderLayer::enable`] apply to every response of the group, and a
/// handler can replace them for its own response with
/// [`EnableRender`](crate::EnableRender).
#[derive(Clone)]
pub struct RenderLayer {
    reporting: Arc<dyn ReportingService>,
    templates: Arc<dyn TemplateRenderer>,
    group: Option<RenderOptions>,
}

impl RenderLayer {
    /// Creates a layer that sends captured responses to `reporting`.
    ///
    /// Rendering is not enabled for the group; handlers opt in individually.
    /// Header and footer templates are unavailable until
    /// [`RenderLayer::templates`] is set.
    pub fn new(reporting: impl ReportingService) -> Self {
        Self {
            reporting: Arc::new(reporting),
            templates: Arc::new(NoTemplates),
            group: None,
        }
    }

    /// Enables rendering for every response of the wrapped group.
    pub fn enable(mut self, options: RenderOptions) -> Self {
        self.group = Some(options);
        self
    }

    /// Sets the renderer used for header and footer templates.
    pub fn templates(mut self, templates: impl TemplateRenderer) -> Self {
        self.templates = Arc::new(templates);
        self
    }
}

impl fmt::Debug for RenderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderLayer")
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for RenderLayer {
    type Service = RenderService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        let shared = Shared {
            reporting: Arc::clone(&self.reporting),
            templates: Arc::clone(&self.templates),
            group: self.group.clone(),
        };
        RenderService::new(inner, Arc::new(shared))
    }
}
