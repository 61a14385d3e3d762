//! Database object references.

use std::fmt;

use serde::Serialize;

/// Schema assumed when a reference omits one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Object kind assumed when a reference omits one.
pub const DEFAULT_KIND: &str = "table";

/// A `(schema, name, kind)` reference to a database object.
///
/// Two references match only when all three fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Dependency {
    pub schema: String,
    pub name: String,
    pub kind: String,
}

impl Dependency {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// A `table` in the `public` schema.
    pub fn table(name: impl Into<String>) -> Self {
        Self::new(DEFAULT_SCHEMA, name, DEFAULT_KIND)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.schema, self.name, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_reference_syntax() {
        let dep = Dependency::new("audit", "events", "index");
        assert_eq!(dep.to_string(), "audit.events:index");
    }

    #[test]
    fn test_equality_is_field_wise() {
        assert_eq!(Dependency::table("users"), Dependency::new("public", "users", "table"));
        assert_ne!(Dependency::table("users"), Dependency::new("public", "users", "view"));
        assert_ne!(Dependency::table("users"), Dependency::new("auth", "users", "table"));
    }
}
