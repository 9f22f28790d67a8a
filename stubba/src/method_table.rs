//! Method tables: the class level methods and the per-instance "own behavior set".

use std::{collections::BTreeMap, fmt, sync::Arc};

use thiserror::Error;

use crate::StdResult;
use crate::entities::{Block, MethodName, Value, Visibility};
use crate::stubbee::Stubbee;

/// Implementation of a method, called with the receiver, the positional arguments and the
/// optional trailing block.
pub type MethodBody =
    Arc<dyn Fn(&dyn Stubbee, Vec<Value>, Option<Block>) -> StdResult<Value> + Send + Sync>;

/// Where a method definition comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodOrigin {
    /// Regular method, can be renamed.
    Defined,

    /// Method provided by a proxy machinery that refuses to rename it.
    ProxyBacked,
}

/// [MethodTable] related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MethodTableError {
    /// No method bound under the name
    #[error("undefined method `{method}`")]
    MethodNotFound {
        /// Name of the missing method
        method: MethodName,
    },

    /// A method is already bound under the name
    #[error("method `{method}` is already defined")]
    MethodAlreadyDefined {
        /// Name of the bound method
        method: MethodName,
    },

    /// The method definition machinery refuses to rename the method
    #[error("method `{method}` can not be renamed to `{new_name}`")]
    RenameUnsupported {
        /// Name of the method that should have been renamed
        method: MethodName,

        /// Name the method should have been renamed to
        new_name: MethodName,
    },

    /// The lock guarding a method table is poisoned
    #[error("Poisoned lock caused error during access to method table")]
    PoisonedLock,
}

/// A method implementation with its visibility.
#[derive(Clone)]
pub struct MethodDefinition {
    body: MethodBody,
    visibility: Visibility,
    origin: MethodOrigin,
}

impl MethodDefinition {
    /// Create a method definition with the given visibility.
    pub fn new<F>(visibility: Visibility, body: F) -> Self
    where
        F: Fn(&dyn Stubbee, Vec<Value>, Option<Block>) -> StdResult<Value> + Send + Sync + 'static,
    {
        Self {
            body: Arc::new(body),
            visibility,
            origin: MethodOrigin::Defined,
        }
    }

    /// Create a public method definition.
    pub fn public<F>(body: F) -> Self
    where
        F: Fn(&dyn Stubbee, Vec<Value>, Option<Block>) -> StdResult<Value> + Send + Sync + 'static,
    {
        Self::new(Visibility::Public, body)
    }

    /// Create a protected method definition.
    pub fn protected<F>(body: F) -> Self
    where
        F: Fn(&dyn Stubbee, Vec<Value>, Option<Block>) -> StdResult<Value> + Send + Sync + 'static,
    {
        Self::new(Visibility::Protected, body)
    }

    /// Create a private method definition.
    pub fn private<F>(body: F) -> Self
    where
        F: Fn(&dyn Stubbee, Vec<Value>, Option<Block>) -> StdResult<Value> + Send + Sync + 'static,
    {
        Self::new(Visibility::Private, body)
    }

    /// Create a public method always returning the given value.
    pub fn returning<T: Into<Value>>(value: T) -> Self {
        let value = value.into();
        Self::public(move |_, _, _| Ok(value.clone()))
    }

    /// Mark the definition as provided by a proxy machinery.
    pub fn proxy_backed(mut self) -> Self {
        self.origin = MethodOrigin::ProxyBacked;
        self
    }

    /// Visibility of the method.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Origin of the method.
    pub fn origin(&self) -> MethodOrigin {
        self.origin
    }

    /// Check if the two definitions share the same implementation.
    pub fn same_body(&self, other: &MethodDefinition) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.body), Arc::as_ptr(&other.body))
    }

    /// Run the method body.
    pub fn invoke(
        &self,
        receiver: &dyn Stubbee,
        arguments: Vec<Value>,
        block: Option<Block>,
    ) -> StdResult<Value> {
        (self.body)(receiver, arguments, block)
    }
}

impl fmt::Debug for MethodDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDefinition")
            .field("body", &Arc::as_ptr(&self.body))
            .field("visibility", &self.visibility)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Methods bound by name.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: BTreeMap<MethodName, MethodDefinition>,
}

impl MethodTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a definition, replacing any previous one.
    pub fn define(&mut self, method: MethodName, definition: MethodDefinition) {
        self.methods.insert(method, definition);
    }

    /// Check if a method is bound with the given visibility.
    pub fn contains(&self, method: &MethodName, visibility: Visibility) -> bool {
        self.methods
            .get(method)
            .is_some_and(|definition| definition.visibility == visibility)
    }

    /// Check if a method is bound, whatever its visibility.
    pub fn contains_any(&self, method: &MethodName) -> bool {
        self.methods.contains_key(method)
    }

    /// Get the definition bound to a method.
    pub fn get(&self, method: &MethodName) -> Option<&MethodDefinition> {
        self.methods.get(method)
    }

    /// Move the definition bound under `from` to `to`, leaving `from` unbound.
    pub fn rename(&mut self, from: &MethodName, to: &MethodName) -> Result<(), MethodTableError> {
        let definition = self
            .methods
            .get(from)
            .ok_or_else(|| MethodTableError::MethodNotFound {
                method: from.clone(),
            })?;
        if definition.origin == MethodOrigin::ProxyBacked {
            return Err(MethodTableError::RenameUnsupported {
                method: from.clone(),
                new_name: to.clone(),
            });
        }
        if self.methods.contains_key(to) {
            return Err(MethodTableError::MethodAlreadyDefined { method: to.clone() });
        }

        if let Some(definition) = self.methods.remove(from) {
            self.methods.insert(to.clone(), definition);
        }

        Ok(())
    }

    /// Unbind a method, returning its definition.
    pub fn remove(&mut self, method: &MethodName) -> Result<MethodDefinition, MethodTableError> {
        self.methods
            .remove(method)
            .ok_or_else(|| MethodTableError::MethodNotFound {
                method: method.clone(),
            })
    }

    /// Names of the bound methods, sorted.
    pub fn names(&self) -> Vec<MethodName> {
        self.methods.keys().cloned().collect()
    }

    /// Number of bound methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if no method is bound.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
