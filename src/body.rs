use bytes::{Buf, Bytes, BytesMut};
use http_body::{Body, Frame};
use http_body_util::Full;
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// A response body that is either the original one or a rendered document.
    ///
    /// Responses that were not rendered keep their body unchanged. Rendered
    /// responses carry the complete document returned by the service.
    #[project = RenderBodyProj]
    #[allow(missing_docs)]
    #[derive(Debug)]
    pub enum RenderBody<B> {
        /// Document returned by the rendering service.
        Rendered {
            #[pin]
            document: Full<Bytes>,
        },
        /// Original body of a response that was not rendered.
        Passthrough {
            #[pin]
            inner: B,
        },
    }
}

impl<B> RenderBody<B> {
    /// Creates a body holding a rendered document.
    pub fn rendered(document: Bytes) -> Self {
        Self::Rendered {
            document: Full::new(document),
        }
    }

    /// Creates a passthrough body.
    pub fn passthrough(inner: B) -> Self {
        Self::Passthrough { inner }
    }
}

impl<B> Body for RenderBody<B>
where
    B: Body,
    B::Data: Buf,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            RenderBodyProj::Passthrough { inner } => match inner.poll_frame(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| {
                        let mut bytes = BytesMut::with_capacity(data.remaining());
                        while data.has_remaining() {
                            let chunk = data.chunk();
                            let len = chunk.len();
                            bytes.extend_from_slice(chunk);
                            data.advance(len);
                        }
                        bytes.freeze()
                    });
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(io::Error::other(e.into())))),
            },
            RenderBodyProj::Rendered { document } => match document.poll_frame(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Ready(Some(Ok(frame))) => Poll::Ready(Some(Ok(frame))),
                Poll::Ready(Some(Err(never))) => match never {},
            },
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            RenderBody::Passthrough { inner } => inner.is_end_stream(),
            RenderBody::Rendered { document } => document.is_end_stream(),
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            RenderBody::Passthrough { inner } => inner.size_hint(),
            RenderBody::Rendered { document } => document.size_hint(),
        }
    }
}
