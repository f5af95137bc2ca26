//! Identity types for Tandem entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Opaque stable user identifier issued by the identity provider.
///
/// A `Principal` is compared structurally by its canonical text form and
/// carries no ordering. Absence of an authenticated principal is always
/// `Option<Principal>`, never a sentinel value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from its canonical text form.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The canonical text form of this principal.
    pub fn as_text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_structural_equality() {
        let a = Principal::from_text("aaaa-bbbb");
        let b = Principal::from_text("aaaa-bbbb");
        let c = Principal::from_text("cccc-dddd");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_principal_display_is_text_form() {
        let p = Principal::from_text("w7x7r-cok77-xa");
        assert_eq!(p.to_string(), "w7x7r-cok77-xa");
        assert_eq!(p.as_text(), "w7x7r-cok77-xa");
    }

    #[test]
    fn test_principal_serde_transparent() {
        let p = Principal::from_text("aaaa-bbbb");
        let json = serde_json::to_string(&p).expect("serialize should succeed");
        assert_eq!(json, "\"aaaa-bbbb\"");

        let back: Principal = serde_json::from_str(&json).expect("deserialize should succeed");
        assert_eq!(back, p);
    }
}
