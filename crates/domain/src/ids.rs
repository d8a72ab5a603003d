use std::fmt;

use serde::{Deserialize, Serialize};

/// Correlation token for one request issued on a connection.
///
/// Identifiers are assigned in send order starting at 1 and are never reused
/// for the lifetime of a connection. `0` is never issued; it is the value of
/// the request/response counters before anything has been sent or drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier issued right after this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RequestId> for u64 {
    fn from(value: RequestId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_strictly_greater() {
        let id = RequestId::new(7);
        assert!(id.next() > id);
        assert_eq!(id.next().get(), 8);
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&RequestId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
