use tracing::trace;

/// A read buffer that doubles its capacity when the unfilled region runs out.
///
/// Bytes are read into [`unfilled_mut`](ReadBuffer::unfilled_mut), published
/// with [`commit`](ReadBuffer::commit) and dropped from the front with
/// [`consume`](ReadBuffer::consume), which shifts the remainder down.
#[derive(Debug)]
pub struct ReadBuffer {
    buf: Vec<u8>,
    filled: usize,
}

impl ReadBuffer {
    /// Creates a buffer with `capacity` bytes, at least one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: vec![0; capacity.max(1)], filled: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The bytes read but not yet consumed.
    #[inline]
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Returns the free tail of the buffer, doubling the capacity first if it is full.
    pub fn unfilled_mut(&mut self) -> &mut [u8] {
        if self.filled == self.buf.len() {
            let doubled = self.buf.len() * 2;
            self.buf.resize(doubled, 0);
            trace!(capacity = doubled, "grow read buffer");
        }
        &mut self.buf[self.filled..]
    }

    /// Marks `n` more bytes of the unfilled region as filled.
    pub fn commit(&mut self, n: usize) {
        debug_assert!(self.filled + n <= self.buf.len());
        self.filled = (self.filled + n).min(self.buf.len());
    }

    /// Drops `n` bytes from the front and moves the rest to the start.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.filled);
        self.buf.copy_within(n..self.filled, 0);
        self.filled -= n;
    }
}
