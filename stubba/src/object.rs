//! Objects that can be stubbed: a shared [Class] plus a per-instance method table consulted
//! first on dispatch.

use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use anyhow::Context;
use thiserror::Error;

use crate::StdResult;
use crate::entities::{Block, MethodName, Value, Visibility};
use crate::method_table::{MethodDefinition, MethodTable, MethodTableError};
use crate::stubbee::{Mock, Stubbee};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Builds the mock of an object the first time it is needed.
pub type MockFactory = Arc<dyn Fn() -> Arc<dyn Mock> + Send + Sync>;

/// [StubbableObject] dispatch errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Neither the object nor its class define the method
    #[error("undefined method `{method}` for {receiver}")]
    NoMethod {
        /// Name of the called method
        method: MethodName,

        /// Representation of the receiver
        receiver: String,
    },

    /// The method exists but is not public
    #[error("{visibility} method `{method}` called for {receiver}")]
    NotPublic {
        /// Name of the called method
        method: MethodName,

        /// Visibility of the method
        visibility: Visibility,

        /// Representation of the receiver
        receiver: String,
    },
}

/// Methods shared by all the instances of a class.
#[derive(Debug)]
pub struct Class {
    name: String,
    methods: MethodTable,
}

impl Class {
    /// Start building a class.
    pub fn builder<T: Into<String>>(name: T) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            methods: MethodTable::new(),
        }
    }

    /// Name of the class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class level methods.
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }
}

/// [Class] builder.
pub struct ClassBuilder {
    name: String,
    methods: MethodTable,
}

impl ClassBuilder {
    /// Add a method to the class.
    pub fn method<T: Into<MethodName>>(mut self, method: T, definition: MethodDefinition) -> Self {
        self.methods.define(method.into(), definition);
        self
    }

    /// Build the class.
    pub fn build(self) -> Arc<Class> {
        Arc::new(Class {
            name: self.name,
            methods: self.methods,
        })
    }
}

/// An instance of a [Class] with its own behavior set.
///
/// Dispatch looks up the own methods first then falls back to the class methods.
pub struct StubbableObject {
    id: u64,
    class: Arc<Class>,
    own_methods: RwLock<MethodTable>,
    mock_factory: MockFactory,
    mocha: Mutex<Option<Arc<dyn Mock>>>,
}

impl StubbableObject {
    /// Create an object whose mock is built by the given factory.
    pub fn new<F>(class: Arc<Class>, mock_factory: F) -> Arc<Self>
    where
        F: Fn() -> Arc<dyn Mock> + Send + Sync + 'static,
    {
        Arc::new(Self {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class,
            own_methods: RwLock::new(MethodTable::new()),
            mock_factory: Arc::new(mock_factory),
            mocha: Mutex::new(None),
        })
    }

    /// Create an object that always uses the given mock.
    pub fn with_mock(class: Arc<Class>, mock: Arc<dyn Mock>) -> Arc<Self> {
        Self::new(class, move || mock.clone())
    }

    /// Unique identifier of the object.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Class of the object.
    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    /// Names of the object own methods, sorted.
    pub fn own_method_names(&self) -> Vec<MethodName> {
        self.read_own_methods().names()
    }

    /// Visibility of a method, own methods first then class methods.
    pub fn method_visibility(&self, method: &MethodName) -> Option<Visibility> {
        self.find_method(method)
            .map(|definition| definition.visibility())
    }

    /// Check if a public method is bound on the object or its class.
    pub fn responds_to(&self, method: &MethodName) -> bool {
        self.method_visibility(method)
            .is_some_and(|visibility| visibility.is_public())
    }

    /// Call a method whatever its visibility.
    pub fn send(
        &self,
        method: &MethodName,
        arguments: Vec<Value>,
        block: Option<Block>,
    ) -> StdResult<Value> {
        let definition = self.find_method(method).ok_or_else(|| DispatchError::NoMethod {
            method: method.clone(),
            receiver: self.inspect(),
        })?;

        definition.invoke(self, arguments, block)
    }

    /// Call a method, refusing protected and private ones.
    pub fn public_send(
        &self,
        method: &MethodName,
        arguments: Vec<Value>,
        block: Option<Block>,
    ) -> StdResult<Value> {
        let definition = self.find_method(method).ok_or_else(|| DispatchError::NoMethod {
            method: method.clone(),
            receiver: self.inspect(),
        })?;
        if !definition.visibility().is_public() {
            return Err(DispatchError::NotPublic {
                method: method.clone(),
                visibility: definition.visibility(),
                receiver: self.inspect(),
            }
            .into());
        }

        definition.invoke(self, arguments, block)
    }

    // The definition is cloned so no lock is held while the body runs.
    fn find_method(&self, method: &MethodName) -> Option<MethodDefinition> {
        if let Some(definition) = self.read_own_methods().get(method) {
            return Some(definition.clone());
        }

        self.class.methods().get(method).cloned()
    }

    fn read_own_methods(&self) -> std::sync::RwLockReadGuard<'_, MethodTable> {
        self.own_methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_own_methods(&self) -> StdResult<std::sync::RwLockWriteGuard<'_, MethodTable>> {
        self.own_methods
            .write()
            .map_err(|_| MethodTableError::PoisonedLock)
            .with_context(|| format!("Could not alter own methods of {}", self.inspect()))
    }
}

impl Stubbee for StubbableObject {
    fn has_own_method(&self, method: &MethodName, visibility: Visibility) -> bool {
        self.read_own_methods().contains(method, visibility)
    }

    fn define_own_method(
        &self,
        method: &MethodName,
        definition: MethodDefinition,
    ) -> StdResult<()> {
        self.write_own_methods()?
            .define(method.clone(), definition);

        Ok(())
    }

    fn rename_own_method(&self, from: &MethodName, to: &MethodName) -> StdResult<()> {
        self.write_own_methods()?.rename(from, to)?;

        Ok(())
    }

    fn remove_own_method(&self, method: &MethodName) -> StdResult<MethodDefinition> {
        let definition = self.write_own_methods()?.remove(method)?;

        Ok(definition)
    }

    fn mocha(&self) -> Arc<dyn Mock> {
        let mut mocha = self.mocha.lock().unwrap_or_else(PoisonError::into_inner);
        mocha.get_or_insert_with(|| (self.mock_factory)()).clone()
    }

    fn reset_mocha(&self) {
        let mut mocha = self.mocha.lock().unwrap_or_else(PoisonError::into_inner);
        *mocha = None;
    }

    fn inspect(&self) -> String {
        format!("#<{}:{}>", self.class.name, self.id)
    }
}

impl fmt::Debug for StubbableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubbableObject")
            .field("id", &self.id)
            .field("class", &self.class.name)
            .field("own_methods", &self.own_method_names())
            .finish()
    }
}

impl fmt::Display for StubbableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}
