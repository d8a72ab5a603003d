//! Test doubles shared by unit tests (and by downstream crates via the `testing` feature).

pub mod fixtures;

pub use fixtures::FakeServer;
