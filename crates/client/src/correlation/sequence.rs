//! Sequence allocator for outgoing requests.

use sc2link_domain::RequestId;

/// Hands out strictly increasing request identifiers, starting at 1.
///
/// Not synchronized: one issuer per connection.
#[derive(Debug, Default)]
pub struct SequenceAllocator {
    last_request: u64,
}

impl SequenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume and return the next identifier.
    pub fn allocate(&mut self) -> RequestId {
        let id = self.peek_next();
        self.last_request = id.get();
        id
    }

    /// The identifier the next `allocate` will return.
    pub fn peek_next(&self) -> RequestId {
        RequestId::new(self.last_request).next()
    }

    /// Highest identifier allocated so far (0 before the first request).
    pub fn last_allocated(&self) -> u64 {
        self.last_request
    }

    /// Whether `id` has been handed out on this connection.
    pub fn was_issued(&self, id: RequestId) -> bool {
        id.get() != 0 && id.get() <= self.last_request
    }
}
