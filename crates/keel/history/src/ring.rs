use keel_types::{KeelError, KeelResult};

/// A bounded circular buffer.
///
/// When full, the oldest items are silently overwritten. Capacity is fixed
/// at construction.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    buffer: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// Create a ring buffer with the given capacity (must be >= 1).
    pub fn new(capacity: usize) -> KeelResult<Self> {
        if capacity == 0 {
            return Err(KeelError::InvalidConfiguration(
                "ring buffer capacity must be at least 1".into(),
            ));
        }
        Ok(Self {
            buffer: vec![None; capacity],
            head: 0,
            len: 0,
        })
    }

    /// Push an item, overwriting the oldest if full.
    pub fn push(&mut self, item: T) {
        self.buffer[self.head] = Some(item);
        self.head = (self.head + 1) % self.buffer.len();
        if self.len < self.buffer.len() {
            self.len += 1;
        }
    }

    /// Copy of the contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Copy of the `n` most recent items, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<T> {
        let skip = self.len.saturating_sub(n);
        self.iter().skip(skip).cloned().collect()
    }

    /// Most recently pushed item.
    pub fn latest(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        let idx = (self.head + self.buffer.len() - 1) % self.buffer.len();
        self.buffer[idx].as_ref()
    }

    /// Iterate over items in insertion order (oldest first).
    pub fn iter(&self) -> RingBufferIter<'_, T> {
        let start = if self.len < self.buffer.len() {
            0
        } else {
            self.head
        };
        RingBufferIter {
            buffer: &self.buffer,
            pos: start,
            remaining: self.len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Clear all items. Capacity is unchanged.
    pub fn clear(&mut self) {
        for slot in &mut self.buffer {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }
}

/// Iterator over a RingBuffer.
pub struct RingBufferIter<'a, T> {
    buffer: &'a [Option<T>],
    pos: usize,
    remaining: usize,
}

impl<'a, T> Iterator for RingBufferIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.buffer[self.pos].as_ref();
        self.pos = (self.pos + 1) % self.buffer.len();
        self.remaining -= 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RingBufferIter<'_, T> {}
