//! Capabilities a stub needs from its target and from the mock collaborator.

use std::sync::Arc;

use crate::StdResult;
use crate::entities::{Block, MethodName, Value, Visibility};
use crate::method_table::MethodDefinition;

/// Records invocations and resolves expectations, all interceptors funnel their calls to it.
#[cfg_attr(test, mockall::automock)]
pub trait Mock: Send + Sync {
    /// Handle a call of `method` on the stubbed object.
    fn method_missing(
        &self,
        method: &MethodName,
        arguments: Vec<Value>,
        block: Option<Block>,
    ) -> StdResult<Value>;
}

/// An object whose own behavior set can be altered by a stub.
///
/// Every operation only looks at the object's own methods, never at its class methods.
#[cfg_attr(test, mockall::automock)]
pub trait Stubbee: Send + Sync {
    /// Check if a method is bound with the given visibility.
    fn has_own_method(&self, method: &MethodName, visibility: Visibility) -> bool;

    /// Bind a method, replacing any previous definition.
    fn define_own_method(&self, method: &MethodName, definition: MethodDefinition)
    -> StdResult<()>;

    /// Move a method under another name.
    ///
    /// Fails with [MethodTableError::RenameUnsupported][crate::method_table::MethodTableError::RenameUnsupported]
    /// if the object refuses to rename the method.
    fn rename_own_method(&self, from: &MethodName, to: &MethodName) -> StdResult<()>;

    /// Unbind a method, fails if it is not bound.
    fn remove_own_method(&self, method: &MethodName) -> StdResult<MethodDefinition>;

    /// The mock associated with the object.
    fn mocha(&self) -> Arc<dyn Mock>;

    /// Drop the current mock so a fresh one is used by the next stub.
    fn reset_mocha(&self);

    /// Human readable representation.
    fn inspect(&self) -> String;
}
