//! Logging utilities.

use slog::Logger;

use crate::entities::MethodName;

/// Extension trait for `slog::Logger`
pub trait LoggerExtensions {
    /// Create a child logger with a `src` key containing the name of the type `T`.
    fn new_with_component_name<T>(&self) -> Self;

    /// Create a child logger with a `target` and a `method` keys describing a stubbed method.
    fn new_with_stubbed_method(&self, target: &str, method: &MethodName) -> Self;
}

impl LoggerExtensions for Logger {
    fn new_with_component_name<T>(&self) -> Self {
        self.new(slog::o!("src" => component_name::<T>()))
    }

    fn new_with_stubbed_method(&self, target: &str, method: &MethodName) -> Self {
        self.new(slog::o!("target" => target.to_owned(), "method" => method.to_string()))
    }
}

/// Last path segment of the type name, without generic parameters.
fn component_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    let without_generics = type_name.split('<').next().unwrap_or(type_name);

    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}
