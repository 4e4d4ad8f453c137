use crate::future::ResponseFuture;
use crate::options::RenderOptions;
use crate::reporting::{ReportingService, TemplateRenderer};
use http::Request;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

/// Collaborators and group options shared by every request of a service.
pub(crate) struct Shared {
    pub(crate) reporting: Arc<dyn ReportingService>,
    pub(crate) templates: Arc<dyn TemplateRenderer>,
    pub(crate) group: Option<RenderOptions>,
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// A Tower service that renders HTML responses into documents.
#[derive(Debug, Clone)]
pub struct RenderService<S> {
    inner: S,
    shared: Arc<Shared>,
}

impl<S> RenderService<S> {
    pub(crate) fn new(inner: S, shared: Arc<Shared>) -> Self {
        Self { inner, shared }
    }

    /// Returns a reference to the inner service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the inner service.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes this service, returning the inner service.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RenderService<S>
where
    S: Service<Request<ReqBody>, Response = http::Response<ResBody>>,
    S::Error: Into<crate::BoxError>,
    ResBody: http_body::Body,
    ResBody::Error: Into<crate::BoxError>,
{
    type Response = http::Response<crate::body::RenderBody<ResBody>>;
    type Error = crate::BoxError;
    type Future = ResponseFuture<S::Future, ResBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let inner = self.inner.call(req);

        ResponseFuture::new(inner, Arc::clone(&self.shared))
    }
}
