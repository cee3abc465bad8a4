//! User-facing failure notices

use std::fmt;

/// A blocking message shown to the user, carrying the underlying error text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Notice whose message is the full context chain of `error`
    pub fn from_error(title: impl Into<String>, error: &anyhow::Error) -> Self {
        Self::new(title, format!("{error:#}"))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
