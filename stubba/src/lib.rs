#![warn(missing_docs)]

//! Method level stubbing for mocking frameworks.
//!
//! Provide:
//! - [MethodStub][method_stub::MethodStub]: replaces one method of one object by an interceptor
//!   forwarding every call to the object [Mock][stubbee::Mock], then restores the original method.
//! - The [Stubbee][stubbee::Stubbee] capabilities a stub needs from its target, implemented by
//!   [StubbableObject][object::StubbableObject]: an object with a per-instance method table
//!   consulted before its [Class][object::Class] methods.
//! - The [entities] shared by both: method names and their hidden form, dynamic values, blocks.
//! - Test doubles and a test logger in the `test` module (`test_tools` feature).

pub mod configuration;
pub mod entities;
pub mod interceptor;
pub mod logging;
pub mod method_stub;
pub mod method_table;
pub mod object;
pub mod stubbee;

#[cfg(any(test, feature = "test_tools"))]
pub mod test;

pub use configuration::{LostOriginalLogLevel, StubbingConfiguration};
pub use method_stub::{MethodStub, OriginalMethodState};
pub use object::{Class, StubbableObject};
pub use stubbee::{Mock, Stubbee};

/// Generic error type
pub type StdError = anyhow::Error;

/// Generic result type
pub type StdResult<T> = anyhow::Result<T, StdError>;
