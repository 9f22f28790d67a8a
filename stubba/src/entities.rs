//! The entities used by the method tables and the stubs.

mod method_name;
mod value;
mod visibility;

pub use method_name::{HIDDEN_METHOD_AFFIX, KEYWORD_SEPARATOR, MethodName};
pub use value::{Block, Value};
pub use visibility::Visibility;
