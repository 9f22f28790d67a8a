//! Test tools: doubles for the mock collaborator and a logger for tests.
//!
//! Only available with the `test_tools` feature.

mod test_logger;

pub use test_logger::{LogBuffer, TestLogger};
