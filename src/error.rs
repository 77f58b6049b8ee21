//! Error types for selector parsing and translation.
//!
//! Two failure classes exist. [`SyntaxError`] covers selector text that
//! violates the selector grammar and is raised by the tokenizer and the
//! parser. [`TranslationError`] covers selectors that parse fine but have no
//! XPath 1.0 rendering, and is raised during compilation. [`Error`] unifies
//! the two for entry points that can hit either.

use std::fmt;

/// An error raised when selector text violates the selector grammar.
///
/// The position is a 0-based char offset into the selector text after
/// comment stripping, so it is approximate relative to the original input
/// when comments are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable error message.
    pub message: String,
    /// 0-based char offset in the selector where the error occurred.
    pub position: usize,
}

impl SyntaxError {
    /// Creates a syntax error at the given position.
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selector syntax error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for SyntaxError {}

/// An error raised when a well-formed selector cannot be expressed in
/// XPath 1.0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// The pseudo-class is recognized but has no XPath 1.0 equivalent, such
    /// as `:hover`, which depends on user interaction state.
    UnsupportedPseudoClass {
        /// The pseudo-class identifier, without the leading colon(s).
        name: String,
    },
    /// The pseudo-class identifier is not recognized at all.
    UnknownPseudoClass {
        /// The pseudo-class identifier, without the leading colon(s).
        name: String,
    },
    /// An `nth-*` argument that is neither an integer, `odd`, `even`, nor
    /// an `an+b` step expression.
    InvalidSeries {
        /// The argument text as written in the selector.
        text: String,
    },
    /// A functional pseudo-class received an argument kind it cannot use,
    /// such as `:not()` with a string literal.
    InvalidArgument {
        /// The function identifier, without colons or parentheses.
        function: String,
    },
    /// A comma-separated selector list appeared below the top level of a
    /// hand-built AST, where no single location path can represent it.
    NestedSelectorList,
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPseudoClass { name } => {
                write!(f, "the pseudo-class ':{name}' is not supported")
            }
            Self::UnknownPseudoClass { name } => {
                write!(f, "unknown pseudo-class ':{name}'")
            }
            Self::InvalidSeries { text } => {
                write!(f, "invalid an+b expression: '{text}'")
            }
            Self::InvalidArgument { function } => {
                write!(f, "invalid argument for ':{function}()'")
            }
            Self::NestedSelectorList => {
                f.write_str("selector lists cannot be nested inside another selector")
            }
        }
    }
}

impl std::error::Error for TranslationError {}

/// Any error that selector compilation can produce.
///
/// [`crate::parse`] raises only [`SyntaxError`]; [`crate::compile`] can fail
/// at either stage and returns this unified type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The selector text does not parse.
    Syntax(SyntaxError),
    /// The selector parses but cannot be translated to XPath 1.0.
    Translation(TranslationError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(err) => err.fmt(f),
            Self::Translation(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(err) => Some(err),
            Self::Translation(err) => Some(err),
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Self::Syntax(err)
    }
}

impl From<TranslationError> for Error {
    fn from(err: TranslationError) -> Self {
        Self::Translation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new("expected ']'", 7);
        assert_eq!(
            err.to_string(),
            "selector syntax error at position 7: expected ']'"
        );
    }

    #[test]
    fn test_translation_error_display() {
        let err = TranslationError::UnsupportedPseudoClass {
            name: "hover".to_string(),
        };
        assert_eq!(err.to_string(), "the pseudo-class ':hover' is not supported");

        let err = TranslationError::UnknownPseudoClass {
            name: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "unknown pseudo-class ':bogus'");

        let err = TranslationError::InvalidSeries {
            text: "3x+1".to_string(),
        };
        assert_eq!(err.to_string(), "invalid an+b expression: '3x+1'");
    }

    #[test]
    fn test_error_from_conversions() {
        let syntax = SyntaxError::new("boom", 0);
        let err: Error = syntax.clone().into();
        assert_eq!(err, Error::Syntax(syntax));

        let translation = TranslationError::NestedSelectorList;
        let err: Error = translation.clone().into();
        assert_eq!(err, Error::Translation(translation));
    }

    #[test]
    fn test_error_source_points_at_stage() {
        use std::error::Error as _;

        let err = Error::Syntax(SyntaxError::new("boom", 3));
        assert!(err.source().is_some());
    }
}
