//! Buffer of drained-but-unclaimed responses plus the drain high-water mark.

use std::collections::HashMap;

use sc2link_domain::RequestId;

/// Responses that have been read off the wire but not yet retrieved, keyed by
/// the request they answer.
///
/// Entries are only added by [`store_drained`](Self::store_drained), which
/// assigns the next identifier in wire order, so the buffer never holds an
/// identifier above [`last_response`](Self::last_response).
#[derive(Debug)]
pub struct PendingResponses<R> {
    inner: HashMap<RequestId, R>,
    last_response: u64,
}

impl<R> Default for PendingResponses<R> {
    fn default() -> Self {
        Self {
            inner: HashMap::new(),
            last_response: 0,
        }
    }
}

impl<R> PendingResponses<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest identifier whose frame has left the wire (0 before any drain).
    pub fn last_response(&self) -> u64 {
        self.last_response
    }

    /// Identifier the next drained frame belongs to.
    pub fn next_to_drain(&self) -> RequestId {
        RequestId::new(self.last_response).next()
    }

    /// Whether the frame for `id` has already been read off the wire.
    pub fn is_drained(&self, id: RequestId) -> bool {
        id.get() <= self.last_response
    }

    /// Buffer a decoded frame under the next identifier, then advance.
    pub fn store_drained(&mut self, response: R) -> RequestId {
        let id = self.next_to_drain();
        self.inner.insert(id, response);
        self.last_response = id.get();
        id
    }

    /// Advance past a frame that was consumed but could not be decoded.
    ///
    /// Nothing is buffered; the identifier behaves as already retrieved.
    pub fn skip_undecodable(&mut self) -> RequestId {
        let id = self.next_to_drain();
        self.last_response = id.get();
        id
    }

    /// Remove and return the response for `id`.
    pub fn take(&mut self, id: RequestId) -> Option<R> {
        self.inner.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every buffered response, returning how many were discarded.
    ///
    /// The high-water mark is kept: those frames are gone from the wire.
    pub fn clear(&mut self) -> usize {
        let count = self.inner.len();
        self.inner.clear();
        count
    }
}
