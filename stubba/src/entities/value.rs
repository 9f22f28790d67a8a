use std::{any::Any, fmt, sync::Arc};

use crate::StdResult;
use crate::entities::MethodName;

/// Dynamically typed value passed to, and returned by, methods.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of value
    #[default]
    Nil,

    /// Boolean
    Boolean(bool),

    /// Signed integer
    Integer(i64),

    /// Floating point number
    Float(f64),

    /// Text
    String(String),

    /// Symbolic name
    Symbol(MethodName),

    /// Ordered list of values
    List(Vec<Value>),

    /// Any other value, compared by identity
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an arbitrary value, two opaque values are equal only if they share the same allocation.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// Check if the value is [Value::Nil].
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Borrow the inner value of an opaque value if it has the requested type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(left), Self::Boolean(right)) => left == right,
            (Self::Integer(left), Self::Integer(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Symbol(left), Self::Symbol(right)) => left == right,
            (Self::List(left), Self::List(right)) => left == right,
            (Self::Opaque(left), Self::Opaque(right)) => {
                std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Symbol(value) => write!(f, ":{value}"),
            Self::List(values) => f.debug_list().entries(values).finish(),
            Self::Opaque(value) => write!(f, "#<opaque {:p}>", Arc::as_ptr(value)),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Nil
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<MethodName> for Value {
    fn from(value: MethodName) -> Self {
        Self::Symbol(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

type BlockFn = dyn Fn(Vec<Value>) -> StdResult<Value> + Send + Sync;

/// Callback given as the trailing argument of a method call.
///
/// Two blocks are equal only if they are clones of the same block.
#[derive(Clone)]
pub struct Block(Arc<BlockFn>);

impl Block {
    /// Create a block from a closure.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(Vec<Value>) -> StdResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    /// Call the block.
    pub fn call(&self, arguments: Vec<Value>) -> StdResult<Value> {
        (self.0)(arguments)
    }

    /// Check if the two blocks are the same callback.
    pub fn ptr_eq(&self, other: &Block) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<block {:p}>", Arc::as_ptr(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_values_are_compared_by_identity() {
        let value = Value::opaque(String::from("payload"));
        let same_payload_other_allocation = Value::opaque(String::from("payload"));

        assert_eq!(value, value.clone());
        assert_ne!(value, same_payload_other_allocation);
    }

    #[test]
    fn downcast_opaque_value() {
        let value = Value::opaque(42_u8);

        assert_eq!(Some(&42_u8), value.downcast_ref::<u8>());
        assert_eq!(None, value.downcast_ref::<u16>());
        assert_eq!(None, Value::Integer(42).downcast_ref::<i64>());
    }

    #[test]
    fn values_of_different_kinds_are_not_equal() {
        assert_ne!(Value::Integer(1), Value::Float(1.0));
        assert_ne!(Value::from("a"), Value::Symbol(MethodName::new("a")));
        assert_ne!(Value::Nil, Value::Boolean(false));
    }

    #[test]
    fn build_list_value_from_vec() {
        assert_eq!(
            Value::List(vec![Value::Integer(1), Value::Integer(2)]),
            Value::from(vec![1, 2])
        );
    }

    #[test]
    fn block_clones_are_equal_but_distinct_blocks_are_not() {
        let block = Block::new(|_| Ok(Value::Nil));
        let other = Block::new(|_| Ok(Value::Nil));

        assert_eq!(block, block.clone());
        assert_ne!(block, other);
    }

    #[test]
    fn call_block_with_arguments() {
        let block = Block::new(|arguments| Ok(Value::Integer(arguments.len() as i64)));

        let result = block.call(vec![Value::Nil, Value::Nil]).unwrap();

        assert_eq!(Value::Integer(2), result);
    }
}
