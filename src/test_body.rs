//! Fake response body shared by the unit tests.

use bytes::Bytes;
use http_body::{Body, Frame};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use crate::request::RenderPayload;

/// A body yielding predefined frames, optionally ending with an error.
///
/// When guarded by a list of render calls, every poll asserts that the
/// rendering service has not been called yet.
pub(crate) struct TestBody {
    frames: VecDeque<Result<Frame<Bytes>, &'static str>>,
    calls: Option<Arc<Mutex<Vec<RenderPayload>>>>,
}

impl TestBody {
    pub(crate) fn new(frames: Vec<Frame<Bytes>>) -> Self {
        Self {
            frames: frames.into_iter().map(Ok).collect(),
            calls: None,
        }
    }

    pub(crate) fn chunks(chunks: &[&'static str]) -> Self {
        Self::new(
            chunks
                .iter()
                .map(|chunk| Frame::data(Bytes::from_static(chunk.as_bytes())))
                .collect(),
        )
    }

    pub(crate) fn then_fail(mut self, error: &'static str) -> Self {
        self.frames.push_back(Err(error));
        self
    }

    pub(crate) fn guarded(mut self, calls: Arc<Mutex<Vec<RenderPayload>>>) -> Self {
        self.calls = Some(calls);
        self
    }
}

impl Body for TestBody {
    type Data = Bytes;
    type Error = &'static str;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if let Some(calls) = &self.calls {
            assert!(calls.lock().unwrap().is_empty());
        }
        Poll::Ready(self.frames.pop_front())
    }
}

/// Polls a body once with a no-op waker.
pub(crate) fn poll_body<B: Body + Unpin>(body: &mut B) -> Option<Result<Frame<B::Data>, B::Error>> {
    let waker = std::task::Waker::noop();
    let mut cx = Context::from_waker(waker);
    match Pin::new(body).poll_frame(&mut cx) {
        Poll::Ready(result) => result,
        Poll::Pending => None,
    }
}
