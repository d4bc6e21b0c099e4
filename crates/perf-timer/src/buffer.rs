//! Chunked, append-only event storage
//!
//! Events live in fixed-capacity [`EventBuffer`] chunks. A [`BufferChain`]
//! keeps the chunks in allocation order; the last chunk is the append
//! target. As soon as the tail fills, a successor chunk is allocated, so
//! an append never has to move previously recorded events.

use crate::events::Event;

/// Default number of events per chunk
pub const DEFAULT_BUFFER_CAPACITY: usize = 32_768;

/// Fixed-capacity chunk of events
///
/// The backing vector is allocated once with the chunk capacity and never
/// grows; its length is the fill cursor.
#[derive(Debug)]
pub struct EventBuffer<'n> {
    events: Vec<Event<'n>>,
    capacity: usize,
}

impl<'n> EventBuffer<'n> {
    /// Allocate an empty chunk holding up to `capacity` events
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Store `event` in the next free slot
    ///
    /// Callers allocate a successor chunk once [`is_full`](Self::is_full)
    /// reports true, so this never grows the backing storage.
    #[inline]
    fn push(&mut self, event: Event<'n>) {
        debug_assert!(!self.is_full(), "append into a full chunk");
        self.events.push(event);
    }

    /// Number of recorded events
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing was recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Chunk capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true once every slot is used
    #[inline]
    pub fn is_full(&self) -> bool {
        self.events.len() >= self.capacity
    }

    /// Recorded events in append order
    pub fn events(&self) -> &[Event<'n>] {
        &self.events
    }

    /// Consume the chunk, yielding events in append order
    pub fn into_events(self) -> std::vec::IntoIter<Event<'n>> {
        self.events.into_iter()
    }
}

/// Ordered sequence of chunks forming the event log
#[derive(Debug)]
pub struct BufferChain<'n> {
    chunks: Vec<EventBuffer<'n>>,
    capacity: usize,
    len: usize,
}

impl<'n> BufferChain<'n> {
    /// Create a chain with one empty head chunk
    pub fn new(capacity: usize) -> Self {
        Self {
            chunks: vec![EventBuffer::with_capacity(capacity)],
            capacity,
            len: 0,
        }
    }

    /// Append `event` to the tail chunk
    ///
    /// Returns true if the tail filled up and a successor chunk was
    /// allocated.
    pub fn push(&mut self, event: Event<'n>) -> bool {
        let filled = match self.chunks.last_mut() {
            Some(tail) => {
                tail.push(event);
                tail.is_full()
            }
            None => {
                let mut head = EventBuffer::with_capacity(self.capacity);
                head.push(event);
                let filled = head.is_full();
                self.chunks.push(head);
                filled
            }
        };

        if filled {
            self.chunks.push(EventBuffer::with_capacity(self.capacity));
        }
        self.len = self.len.saturating_add(1);
        filled
    }

    /// Total number of events across all chunks
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no event was appended
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated chunks, including an empty tail
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Per-chunk capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Chunks in allocation order
    pub fn chunks(&self) -> &[EventBuffer<'n>] {
        &self.chunks
    }

    /// All events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Event<'n>> {
        self.chunks.iter().flat_map(EventBuffer::events)
    }

    /// Consume the chain, yielding chunks oldest first
    pub fn into_chunks(self) -> std::vec::IntoIter<EventBuffer<'n>> {
        self.chunks.into_iter()
    }
}
