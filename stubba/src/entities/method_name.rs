use std::{fmt, sync::Arc};

/// Prefix and suffix surrounding every hidden method name.
pub const HIDDEN_METHOD_AFFIX: &str = "__stubba__";

/// Separator between the parts of a keyword selector (ie: `setObject:forKey:`).
pub const KEYWORD_SEPARATOR: char = ':';

/// Canonical symbolic name of a method.
///
/// Cloning is cheap, the underlying text is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodName(Arc<str>);

impl MethodName {
    /// Create a method name from its textual representation.
    pub fn new<T: AsRef<str>>(name: T) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Textual representation of the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name under which the original method is kept while a stub is active.
    ///
    /// The result is `__stubba__<escaped name>__stubba__` where every non-word character of the
    /// name is replaced by `_substituted_character_<decimal codepoint>_`.
    pub fn hidden(&self) -> MethodName {
        MethodName::new(format!(
            "{HIDDEN_METHOD_AFFIX}{}{HIDDEN_METHOD_AFFIX}",
            escape_non_word_characters(&self.0)
        ))
    }

    /// Check if the name is a multi-part keyword selector.
    pub fn is_keyword_selector(&self) -> bool {
        self.0.contains(KEYWORD_SEPARATOR)
    }

    /// Number of positional parameters encoded by a keyword selector, `None` for a plain name.
    ///
    /// Trailing empty segments don't count and a selector always takes at least one parameter:
    /// `foo:bar:` takes two, `foo:` and `:` take one.
    pub fn keyword_arity(&self) -> Option<usize> {
        if !self.is_keyword_selector() {
            return None;
        }

        let mut segments: Vec<&str> = self.0.split(KEYWORD_SEPARATOR).collect();
        while segments.last().is_some_and(|segment| segment.is_empty()) {
            segments.pop();
        }

        Some(segments.len().max(1))
    }
}

fn escape_non_word_characters(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for character in name.chars() {
        if character.is_ascii_alphanumeric() || character == '_' {
            escaped.push(character);
        } else {
            escaped.push_str(&format!("_substituted_character_{}_", u32::from(character)));
        }
    }

    escaped
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MethodName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MethodName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MethodName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&MethodName> for MethodName {
    fn from(name: &MethodName) -> Self {
        name.clone()
    }
}

impl PartialEq<str> for MethodName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for MethodName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
