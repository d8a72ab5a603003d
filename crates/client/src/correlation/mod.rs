//! Request/response correlation over one ordered connection.
//!
//! - [`SequenceAllocator`] hands out request identifiers
//! - [`PendingResponses`] buffers drained frames until they are claimed
//! - [`Correlator`] ties both to a transport and a codec
//! - [`SharedCorrelator`] lets several tasks use one correlator

pub mod correlator;
pub mod error;
pub mod pending;
pub mod sequence;
pub mod shared;
pub mod status;

pub use correlator::Correlator;
pub use error::CorrelationError;
pub use pending::PendingResponses;
pub use sequence::SequenceAllocator;
pub use shared::SharedCorrelator;
pub use status::{StatusCell, StatusObserver};
