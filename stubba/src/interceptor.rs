//! Interceptors: the methods standing in for stubbed methods.
//!
//! An interceptor resolves the receiver mock on every call, so the same definition works for any
//! receiver and always targets the mock in place at call time.

use thiserror::Error;

use crate::configuration::StubbingConfiguration;
use crate::entities::MethodName;
use crate::method_table::MethodDefinition;

/// Interceptor call errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterceptorError {
    /// A keyword selector was called with a number of arguments not matching its parts
    #[error("wrong number of arguments for `{method}` (given {given}, expected {expected})")]
    WrongNumberOfArguments {
        /// Keyword selector
        method: MethodName,

        /// Number of parts of the selector
        expected: usize,

        /// Number of arguments received
        given: usize,
    },
}

/// Build the public method forwarding every call of `method` to the receiver mock.
pub fn interceptor_for(
    method: &MethodName,
    configuration: &StubbingConfiguration,
) -> MethodDefinition {
    match method.keyword_arity() {
        Some(arity) if configuration.validate_keyword_arity => {
            keyword_selector_interceptor(method.clone(), arity)
        }
        _ => variadic_interceptor(method.clone()),
    }
}

fn variadic_interceptor(method: MethodName) -> MethodDefinition {
    MethodDefinition::public(move |receiver, arguments, block| {
        receiver.mocha().method_missing(&method, arguments, block)
    })
}

fn keyword_selector_interceptor(method: MethodName, arity: usize) -> MethodDefinition {
    MethodDefinition::public(move |receiver, arguments, block| {
        if arguments.len() != arity {
            return Err(InterceptorError::WrongNumberOfArguments {
                method: method.clone(),
                expected: arity,
                given: arguments.len(),
            }
            .into());
        }

        receiver.mocha().method_missing(&method, arguments, block)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;

    use crate::entities::{Block, Value, Visibility};
    use crate::stubbee::{Mock, MockMock, MockStubbee, Stubbee};

    use super::*;

    fn receiver_with_mock(mock: MockMock) -> MockStubbee {
        let mock: Arc<dyn Mock> = Arc::new(mock);
        let mut receiver = MockStubbee::new();
        receiver
            .expect_mocha()
            .returning(move || mock.clone());
        receiver
    }

    #[test]
    fn interceptor_is_public() {
        let interceptor =
            interceptor_for(&MethodName::new("save"), &StubbingConfiguration::default());

        assert_eq!(Visibility::Public, interceptor.visibility());
    }

    #[test]
    fn variadic_interceptor_forwards_call_and_returns_mock_result() {
        let block = Block::new(|_| Ok(Value::Nil));
        let mut mock = MockMock::new();
        {
            let block = block.clone();
            mock.expect_method_missing()
                .withf(move |method, arguments, given_block| {
                    method == &MethodName::new("save")
                        && arguments == &vec![Value::Integer(1), Value::from("two")]
                        && given_block.as_ref() == Some(&block)
                })
                .times(1)
                .returning(|_, _, _| Ok(Value::Boolean(true)));
        }
        let receiver = receiver_with_mock(mock);
        let interceptor =
            interceptor_for(&MethodName::new("save"), &StubbingConfiguration::default());

        let result = interceptor
            .invoke(
                &receiver,
                vec![Value::Integer(1), Value::from("two")],
                Some(block),
            )
            .unwrap();

        assert_eq!(Value::Boolean(true), result);
    }

    #[test]
    fn interceptor_resolves_mock_on_every_call() {
        let mut receiver = MockStubbee::new();
        receiver.expect_mocha().times(2).returning(|| {
            let mut mock = MockMock::new();
            mock.expect_method_missing()
                .times(1)
                .returning(|_, _, _| Ok(Value::Nil));
            Arc::new(mock) as Arc<dyn Mock>
        });
        let interceptor =
            interceptor_for(&MethodName::new("reload"), &StubbingConfiguration::default());

        interceptor.invoke(&receiver, vec![], None).unwrap();
        interceptor.invoke(&receiver, vec![], None).unwrap();
    }

    #[test]
    fn keyword_selector_interceptor_forwards_unsplit_name_and_arguments_in_order() {
        let mut mock = MockMock::new();
        mock.expect_method_missing()
            .with(
                eq(MethodName::new("foo:bar:")),
                eq(vec![Value::Integer(1), Value::Integer(2)]),
                mockall::predicate::always(),
            )
            .times(1)
            .returning(|_, _, _| Ok(Value::from("done")));
        let receiver = receiver_with_mock(mock);
        let interceptor =
            interceptor_for(&MethodName::new("foo:bar:"), &StubbingConfiguration::default());

        let result = interceptor
            .invoke(&receiver, vec![Value::Integer(1), Value::Integer(2)], None)
            .unwrap();

        assert_eq!(Value::from("done"), result);
    }

    #[test]
    fn keyword_selector_interceptor_rejects_wrong_number_of_arguments() {
        let mut mock = MockMock::new();
        mock.expect_method_missing().never();
        let receiver = receiver_with_mock(mock);
        let interceptor =
            interceptor_for(&MethodName::new("foo:bar:"), &StubbingConfiguration::default());

        let error = interceptor
            .invoke(&receiver, vec![Value::Integer(1)], None)
            .unwrap_err();

        assert_eq!(
            Some(&InterceptorError::WrongNumberOfArguments {
                method: MethodName::new("foo:bar:"),
                expected: 2,
                given: 1,
            }),
            error.downcast_ref::<InterceptorError>()
        );
    }

    #[test]
    fn keyword_selector_arity_check_can_be_disabled() {
        let mut mock = MockMock::new();
        mock.expect_method_missing()
            .times(1)
            .returning(|_, _, _| Ok(Value::Nil));
        let receiver = receiver_with_mock(mock);
        let configuration = StubbingConfiguration {
            validate_keyword_arity: false,
            ..StubbingConfiguration::default()
        };
        let interceptor = interceptor_for(&MethodName::new("foo:bar:"), &configuration);

        interceptor
            .invoke(&receiver, vec![Value::Integer(1)], None)
            .unwrap();
    }

    #[test]
    fn receiver_is_used_as_a_stubbee() {
        let receiver = receiver_with_mock({
            let mut mock = MockMock::new();
            mock.expect_method_missing()
                .returning(|_, _, _| Ok(Value::Nil));
            mock
        });
        let receiver: &dyn Stubbee = &receiver;
        let interceptor =
            interceptor_for(&MethodName::new("reload"), &StubbingConfiguration::default());

        assert!(interceptor.invoke(receiver, vec![], None).unwrap().is_nil());
    }
}
