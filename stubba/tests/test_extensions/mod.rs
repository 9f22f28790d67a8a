#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use stubba::StdResult;
use stubba::entities::{Block, MethodName, Value};
use stubba::method_table::MethodDefinition;
use stubba::{Class, Mock, StubbableObject};

/// A call seen by a [SpyMock].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: MethodName,
    pub arguments: Vec<Value>,
    pub block: Option<Block>,
}

/// Mock answering every call with the number of arguments it received.
#[derive(Default)]
pub struct SpyMock {
    calls: Mutex<Vec<Call>>,
}

impl SpyMock {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Mock for SpyMock {
    fn method_missing(
        &self,
        method: &MethodName,
        arguments: Vec<Value>,
        block: Option<Block>,
    ) -> StdResult<Value> {
        let arity = arguments.len() as i64;
        self.calls.lock().unwrap().push(Call {
            method: method.clone(),
            arguments,
            block,
        });

        Ok(Value::Integer(arity))
    }
}

pub fn account_class() -> Arc<Class> {
    Class::builder("Account")
        .method("balance", MethodDefinition::returning(100))
        .method(
            "deposit",
            MethodDefinition::public(|_, arguments, _| {
                Ok(arguments.first().cloned().unwrap_or_default())
            }),
        )
        .method(
            "audit_log",
            MethodDefinition::private(|_, _, _| Ok(Value::from("audited"))),
        )
        .build()
}

pub fn account() -> (Arc<StubbableObject>, Arc<SpyMock>) {
    let mock = Arc::new(SpyMock::default());
    let object = StubbableObject::with_mock(account_class(), mock.clone());

    (object, mock)
}

pub fn method(name: &str) -> MethodName {
    MethodName::new(name)
}
