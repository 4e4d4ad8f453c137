use bytes::{Buf, BytesMut};

/// Accumulates everything written to a response body.
///
/// Writes go to memory instead of the client. [`CaptureSink::close`] hands
/// out the captured text exactly once; later writes and closes are ignored.
#[derive(Debug, Default)]
pub(crate) struct CaptureSink {
    buffer: BytesMut,
    closed: bool,
}

impl CaptureSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk of body data.
    pub(crate) fn write<D: Buf>(&mut self, mut data: D) {
        if self.closed {
            return;
        }
        while data.has_remaining() {
            let chunk = data.chunk();
            let len = chunk.len();
            self.buffer.extend_from_slice(chunk);
            data.advance(len);
        }
    }

    /// Finishes capturing and returns the text, or `None` if already closed.
    pub(crate) fn close(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }
        self.closed = true;
        let buffer = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }
}
