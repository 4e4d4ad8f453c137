use crate::body::RenderBody;
use crate::builder::build_request;
use crate::capture::CaptureSink;
use crate::eligibility::{self, Eligibility, ExecutionState};
use crate::error::{BoxError, RenderError};
use crate::headers::apply_render_result;
use crate::options::{EnableRender, RenderOptions};
use crate::reporting::{BoxFuture, RenderResult};
use crate::request::PartialRenderRequest;
use crate::service::Shared;
use http::Response;
use http::response::Parts;
use http_body::Body;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use tracing::{debug, warn};

pin_project! {
    /// Future for render service responses.
    ///
    /// Resolves only after the whole inner body has been captured and the
    /// rendering service has answered, so no byte of an intercepted response
    /// reaches the client before the document is ready.
    pub struct ResponseFuture<F, B> {
        #[pin]
        state: State<F, B>,
        shared: Arc<Shared>,
    }
}

pin_project! {
    #[project = StateProj]
    enum State<F, B> {
        /// Waiting for the inner service.
        Inner {
            #[pin]
            future: F,
        },
        /// Diverting the inner body into the capture sink.
        Capturing {
            #[pin]
            body: B,
            parts: Option<Parts>,
            sink: CaptureSink,
            options: Option<RenderOptions>,
            partial: Option<PartialRenderRequest>,
        },
        /// Waiting for the rendering service.
        Rendering {
            parts: Option<Parts>,
            content_disposition: Option<String>,
            call: BoxFuture<'static, Result<RenderResult, BoxError>>,
        },
    }
}

impl<F, B> ResponseFuture<F, B> {
    pub(crate) fn new(inner: F, shared: Arc<Shared>) -> Self {
        Self {
            state: State::Inner { future: inner },
            shared,
        }
    }
}

impl<F, B, E> Future for ResponseFuture<F, B>
where
    F: Future<Output = Result<Response<B>, E>>,
    E: Into<BoxError>,
    B: Body,
    B::Error: Into<BoxError>,
{
    type Output = Result<Response<RenderBody<B>>, BoxError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let mut this = self.as_mut().project();

            let next = match this.state.as_mut().project() {
                StateProj::Inner { future } => {
                    let response = match ready!(future.poll(cx)) {
                        Ok(response) => response,
                        Err(e) => return Poll::Ready(Err(e.into())),
                    };

                    let options = match decide(&response, this.shared.group.as_ref()) {
                        Eligibility::Render(options) => options,
                        Eligibility::Skip(reason) => {
                            debug!(?reason, "response not rendered");
                            return Poll::Ready(Ok(response.map(RenderBody::passthrough)));
                        }
                    };

                    let (mut parts, body) = response.into_parts();
                    let partial = parts.extensions.remove::<PartialRenderRequest>();

                    State::Capturing {
                        body,
                        parts: Some(parts),
                        sink: CaptureSink::new(),
                        options: Some(options),
                        partial,
                    }
                }

                StateProj::Capturing {
                    body,
                    parts,
                    sink,
                    options,
                    partial,
                } => match ready!(body.poll_frame(cx)) {
                    Some(Ok(frame)) => {
                        // Trailers of the original body are dropped
                        if let Ok(data) = frame.into_data() {
                            sink.write(data);
                        }
                        continue;
                    }
                    Some(Err(e)) => {
                        return Poll::Ready(Err(RenderError::Body(e.into()).into()));
                    }
                    None => {
                        let captured_bytes = sink.len();
                        let captured = sink.close().unwrap_or_default();
                        let options = options.take().unwrap_or_default();

                        let payload = build_request(
                            &captured,
                            &options,
                            partial.as_ref(),
                            this.shared.templates.as_ref(),
                        )
                        .inspect_err(|e| warn!(error = %e, "failed to build render request"))?;

                        debug!(
                            recipe = ?payload.recipe(),
                            captured_bytes,
                            "sending captured response to rendering service"
                        );

                        State::Rendering {
                            parts: parts.take(),
                            content_disposition: options
                                .content_disposition_override()
                                .map(str::to_owned),
                            call: this.shared.reporting.render(payload),
                        }
                    }
                },

                StateProj::Rendering {
                    parts,
                    content_disposition,
                    call,
                } => {
                    let result = ready!(call.as_mut().poll(cx)).map_err(|e| {
                        warn!(error = %e, "rendering service failed");
                        RenderError::Remote(e)
                    })?;

                    let Some(mut parts) = parts.take() else {
                        panic!("ResponseFuture polled after completion");
                    };
                    apply_render_result(&mut parts, &result, content_disposition.as_deref())?;

                    debug!(
                        status = %result.status,
                        media_type = %result.media_type,
                        bytes = result.content.len(),
                        "response replaced with rendered document"
                    );

                    return Poll::Ready(Ok(Response::from_parts(
                        parts,
                        RenderBody::rendered(result.content),
                    )));
                }
            };

            this.state.set(next);
        }
    }
}

/// Runs the eligibility gate on the context attached to a response.
fn decide<B>(response: &Response<B>, group: Option<&RenderOptions>) -> Eligibility {
    let extensions = response.extensions();
    let state = extensions
        .get::<ExecutionState>()
        .copied()
        .unwrap_or_default();
    let handler = extensions.get::<EnableRender>().map(|enable| &enable.0);

    eligibility::resolve(&state, group, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::SkipReason;

    fn pdf() -> RenderOptions {
        RenderOptions::new().format("pdf")
    }

    #[test]
    fn test_decide_reads_handler_options() {
        let mut response = Response::new(());
        response.extensions_mut().insert(EnableRender(pdf()));

        assert_eq!(decide(&response, None), Eligibility::Render(pdf()));
    }

    #[test]
    fn test_decide_uses_group_options() {
        let response = Response::new(());
        assert_eq!(decide(&response, Some(&pdf())), Eligibility::Render(pdf()));
    }

    #[test]
    fn test_decide_without_options() {
        let response = Response::new(());
        assert_eq!(
            decide(&response, None),
            Eligibility::Skip(SkipReason::NotEnabled)
        );
    }

    #[test]
    fn test_decide_reads_execution_state() {
        let mut response = Response::new(());
        response.extensions_mut().insert(EnableRender(pdf()));
        response.extensions_mut().insert(ExecutionState {
            canceled: true,
            ..ExecutionState::default()
        });

        assert_eq!(
            decide(&response, None),
            Eligibility::Skip(SkipReason::Canceled)
        );
    }
}
