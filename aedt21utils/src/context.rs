//!
//! # Error Contexts
//!

use std::fmt;

/// Enumerated locations within an argument tree or registry.
/// Stacked by tree-walkers and reported upon failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
    /// Entity kind, e.g. "Component"
    Kind(String),
    /// Named entity
    Entity(String),
    /// Named sub-sequence, from its `NAME:` tag
    Group(String),
    /// `key:=` pair
    Key(String),
    /// Positional entry
    Index(usize),
}
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Kind(s) => write!(f, "<{}>", s),
            Self::Entity(s) | Self::Group(s) | Self::Key(s) => write!(f, "{}", s),
            Self::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Render a context-stack as a slash-separated path, e.g. `Box/pad/[2]`
pub fn context_path(stack: &[ErrorContext]) -> String {
    stack
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("/")
}
