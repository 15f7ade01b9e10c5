//! In-memory API credential

use std::fmt;

/// A user-supplied API key
///
/// The secret lives only in memory. `Debug` and `Display` print a redacted
/// placeholder so the key cannot leak through logs or `{:?}` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw key
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// An absent credential
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when nothing but whitespace was supplied
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The key as it should be sent on the wire
    pub fn expose(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_empty() { "<empty>" } else { "********" })
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
