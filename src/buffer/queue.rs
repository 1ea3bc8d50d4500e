use std::collections::VecDeque;

use tracing::trace;

/// An ordered queue of owned byte chunks with a consumed-offset into the
/// head chunk.
///
/// Each chunk is a contiguous span of bytes, exclusively owned by the
/// queue and immutable until consumed — except that the tail chunk may be
/// grown in place while it stays small (see [`append`](Self::append)).
///
/// The queue maintains a cached total of unconsumed bytes, updated on
/// every append and consume:
///
/// ```text
/// total == sum of chunk sizes - head offset
/// ```
///
/// Fully consumed chunks are dropped immediately, so the head offset is
/// always strictly inside the head chunk (or zero for an empty queue).
pub(crate) struct ChunkQueue {
    /// The buffered chunks, oldest first.
    chunks: VecDeque<Vec<u8>>,

    /// How many bytes of the head chunk have already been consumed.
    head_offset: usize,

    /// Cached count of unconsumed bytes across all chunks.
    total: usize,
}

impl ChunkQueue {
    /// Creates an empty queue.
    pub(crate) fn new() -> Self {
        Self {
            chunks: VecDeque::new(),
            head_offset: 0,
            total: 0,
        }
    }

    /// Returns the number of unconsumed bytes.
    pub(crate) fn len(&self) -> usize {
        self.total
    }

    /// Returns `true` when no unconsumed bytes remain.
    pub(crate) fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Drops all buffered chunks.
    pub(crate) fn clear(&mut self) {
        self.chunks.clear();
        self.head_offset = 0;
        self.total = 0;
    }

    /// Appends an already allocated chunk at the tail.
    ///
    /// Empty chunks are ignored.
    pub(crate) fn push_chunk(&mut self, chunk: Vec<u8>) {
        if chunk.is_empty() {
            return;
        }

        self.total += chunk.len();
        self.chunks.push_back(chunk);
    }

    /// Appends bytes at the tail, merging into the tail chunk while the
    /// combined size stays under `merge_below`.
    ///
    /// Growing the tail in place amortizes the per-transmission cost of
    /// many tiny appends; larger appends get their own exactly-sized
    /// chunk so no extra copy happens.
    pub(crate) fn append(&mut self, data: &[u8], merge_below: usize) {
        if data.is_empty() {
            return;
        }

        self.total += data.len();

        if let Some(tail) = self.chunks.back_mut() {
            if tail.len() + data.len() < merge_below {
                tail.extend_from_slice(data);
                trace!(bytes = data.len(), tail = tail.len(), "merged into tail chunk");
                return;
            }
        }

        self.chunks.push_back(data.to_vec());
    }

    /// Consumes `n` bytes from the head of the queue.
    ///
    /// Walks chunks from the head: whole head remainders are dropped
    /// (copied to `destination` when one is given) and the offset reset;
    /// a partial consume advances the offset in place. Returns `false`
    /// without side effects when `n` is zero or exceeds the unconsumed
    /// total.
    pub(crate) fn consume(&mut self, n: usize, mut destination: Option<&mut Vec<u8>>) -> bool {
        if n == 0 || n > self.total {
            return false;
        }

        let mut remaining = n;

        while remaining > 0 {
            let head_len = match self.chunks.front() {
                Some(chunk) => chunk.len() - self.head_offset,
                None => break,
            };

            if remaining >= head_len {
                if let Some(dest) = destination.as_deref_mut() {
                    if let Some(chunk) = self.chunks.front() {
                        dest.extend_from_slice(&chunk[self.head_offset..]);
                    }
                }

                self.chunks.pop_front();
                self.head_offset = 0;
                remaining -= head_len;
            } else {
                if let Some(dest) = destination.as_deref_mut() {
                    if let Some(chunk) = self.chunks.front() {
                        dest.extend_from_slice(&chunk[self.head_offset..self.head_offset + remaining]);
                    }
                }

                self.head_offset += remaining;
                remaining = 0;
            }
        }

        self.total -= n;
        true
    }

    /// Returns the unconsumed remainder of the head chunk.
    ///
    /// Empty queue yields an empty slice.
    pub(crate) fn head_remainder(&self) -> &[u8] {
        match self.chunks.front() {
            Some(chunk) => &chunk[self.head_offset..],
            None => &[],
        }
    }

    /// Iterates the unconsumed byte spans in order, the head chunk
    /// starting at its offset.
    pub(crate) fn unconsumed(&self) -> impl Iterator<Item = &[u8]> {
        self.chunks.iter().enumerate().map(|(index, chunk)| {
            if index == 0 {
                &chunk[self.head_offset..]
            } else {
                chunk.as_slice()
            }
        })
    }
}
