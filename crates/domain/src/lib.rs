//! sc2link Domain - vocabulary shared by the wire protocol and the client.
//!
//! Pure data types: no I/O, no async.

pub mod ids;
pub mod status;

pub use ids::RequestId;
pub use status::Status;
