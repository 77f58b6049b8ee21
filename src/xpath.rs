//! XPath fragment builder.
//!
//! Translation accumulates its output in an [`XPathExpr`]: an element path
//! plus an optional conjunctive condition, matching the shape of an XPath 1.0
//! location step with predicates
//! (<https://www.w3.org/TR/xpath-10/#location-paths>). The builder is
//! immutable: every refinement consumes the value and returns a new one, so
//! compiling a sub-tree twice can never observe a half-refined fragment.
//!
//! Rendering appends the condition in brackets after the path: `path` or
//! `path[condition]`. Index refinements go onto the path itself, so an index
//! followed by a condition renders as `path[index][condition]`.

use std::fmt;

/// An XPath fragment under construction: an element path plus an optional
/// accumulated condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathExpr {
    path: String,
    condition: Option<String>,
}

impl XPathExpr {
    /// Creates a fragment with the given element path and no condition.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            condition: None,
        }
    }

    /// Returns a fragment with the condition conjoined onto any existing one.
    ///
    /// The first condition is stored as-is; later ones are appended as
    /// `<old> and (<new>)`.
    #[must_use]
    pub fn with_condition(self, condition: impl Into<String>) -> Self {
        let condition = condition.into();
        let condition = match self.condition {
            Some(old) => format!("{old} and ({condition})"),
            None => condition,
        };
        Self {
            path: self.path,
            condition: Some(condition),
        }
    }

    /// Returns a fragment with `[index]` appended to the element path.
    ///
    /// The index lands on the path, not the condition, so it renders before
    /// any condition brackets.
    #[must_use]
    pub fn with_index(self, index: impl fmt::Display) -> Self {
        Self {
            path: format!("{}[{index}]", self.path),
            condition: self.condition,
        }
    }

    /// Returns a fragment with the context prefix prepended to the path.
    #[must_use]
    pub fn prefixed(self, prefix: &str) -> Self {
        Self {
            path: format!("{prefix}{}", self.path),
            condition: self.condition,
        }
    }

    /// The element path built so far, without the condition.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The accumulated condition, if any.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

impl fmt::Display for XPathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some(condition) = &self.condition {
            write!(f, "[{condition}]")?;
        }
        Ok(())
    }
}

/// Quotes a value as an XPath string literal.
///
/// The value is wrapped in single quotes with no embedded-quote escaping;
/// XPath 1.0 has no escape mechanism inside literals, so a value containing
/// `'` produces a malformed query. A documented limitation.
pub(crate) fn literal(value: &str) -> String {
    format!("'{value}'")
}
