//! Fixed-capacity ring buffers for the real-time path.
//!
//! Neither type allocates after construction or shifts memory; cursors wrap
//! modulo the capacity instead.

/// Fixed-capacity FIFO ring buffer.
#[derive(Debug, Clone)]
pub struct RingBuffer<T>
where
    T: Copy + Default,
{
    data: Vec<T>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> RingBuffer<T>
where
    T: Copy + Default,
{
    /// Creates an empty ring buffer with fixed capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            data: vec![T::default(); cap],
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns available free space.
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Pushes one element. Returns `false` if the buffer is full.
    #[inline]
    pub fn push(&mut self, value: T) -> bool {
        if self.len == self.capacity() {
            return false;
        }
        self.data[self.tail] = value;
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
        true
    }

    /// Pops one element from the front.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.data[self.head];
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Some(value)
    }

    /// Pushes as much of `values` as fits. Returns the number pushed.
    pub fn push_slice(&mut self, values: &[T]) -> usize {
        let to_copy = values.len().min(self.available());
        if to_copy == 0 {
            return 0;
        }

        let first = to_copy.min(self.capacity() - self.tail);
        self.data[self.tail..self.tail + first].copy_from_slice(&values[..first]);
        let rest = to_copy - first;
        if rest > 0 {
            self.data[..rest].copy_from_slice(&values[first..to_copy]);
        }

        self.tail = (self.tail + to_copy) % self.capacity();
        self.len += to_copy;
        to_copy
    }

    /// Copies elements from the front into `out` without removing them.
    ///
    /// Returns the number of copied elements.
    pub fn peek_slice(&self, out: &mut [T]) -> usize {
        let to_copy = out.len().min(self.len);
        if to_copy == 0 {
            return 0;
        }

        let first = to_copy.min(self.capacity() - self.head);
        out[..first].copy_from_slice(&self.data[self.head..self.head + first]);
        let rest = to_copy - first;
        if rest > 0 {
            out[first..to_copy].copy_from_slice(&self.data[..rest]);
        }
        to_copy
    }

    /// Discards up to `n` elements from the front.
    ///
    /// Returns the number of elements discarded.
    pub fn discard(&mut self, n: usize) -> usize {
        let to_drop = n.min(self.len);
        if to_drop == 0 {
            return 0;
        }
        self.head = (self.head + to_drop) % self.capacity();
        self.len -= to_drop;
        to_drop
    }

    /// Moves every element of `src` that fits into `self`, oldest first.
    ///
    /// Returns the number of elements moved.
    pub fn extend_from(&mut self, src: &mut RingBuffer<T>) -> usize {
        let mut moved = 0;
        while self.available() > 0 {
            match src.pop() {
                Some(value) => {
                    self.push(value);
                    moved += 1;
                }
                None => break,
            }
        }
        moved
    }
}

/// Circular overlap-add accumulator.
///
/// Slot 0 is the next sample to be emitted. Frames are summed in at an
/// offset from that slot; emitting a sample zeroes its slot so it is clean
/// when the cursor wraps back around.
#[derive(Debug, Clone)]
pub struct OverlapAddBuffer {
    data: Vec<f32>,
    head: usize,
}

impl OverlapAddBuffer {
    /// Creates a zeroed accumulator holding `cap` samples.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            data: vec![0.0; cap],
            head: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Adds `frame` into the slots starting `offset` samples after the head.
    ///
    /// `offset + frame.len()` must not exceed the capacity.
    pub fn accumulate(&mut self, offset: usize, frame: &[f32]) {
        debug_assert!(offset + frame.len() <= self.capacity());
        let cap = self.capacity();
        let start = (self.head + offset) % cap;
        let first = frame.len().min(cap - start);

        for (slot, &x) in self.data[start..start + first].iter_mut().zip(&frame[..first]) {
            *slot += x;
        }
        for (slot, &x) in self.data.iter_mut().zip(&frame[first..]) {
            *slot += x;
        }
    }

    /// Value `offset` samples after the head, without consuming it.
    #[inline]
    pub fn peek(&self, offset: usize) -> f32 {
        self.data[(self.head + offset) % self.capacity()]
    }

    /// Emits the head sample and zeroes its slot.
    #[inline]
    pub fn pop_front(&mut self) -> f32 {
        let value = std::mem::take(&mut self.data[self.head]);
        self.head = (self.head + 1) % self.capacity();
        value
    }
}
