//! Abstract syntax tree types for CSS selectors.
//!
//! This module defines the AST produced by [`crate::parse`]. The shape
//! follows the Selectors Level 3 grammar from
//! <https://www.w3.org/TR/selectors-3/#grammar>.
//!
//! Qualifiers wrap the selector built so far, innermost first: `div.note#x`
//! parses as `Hash(Class(Element(div), "note"), "x")`. Combinators join
//! fully qualified simple selectors left-associatively, and a top-level
//! comma group becomes [`Selector::Or`].

use std::fmt;

/// A parsed CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A type or universal selector, optionally namespaced (`div`, `*`,
    /// `svg|rect`).
    ///
    /// See Selectors Level 3 sections 6.1 and 6.2.
    Element {
        /// Namespace prefix; `None` matches any namespace.
        namespace: Option<String>,
        /// Element name; `*` matches any element.
        name: String,
    },

    /// An ID qualifier (`#main`).
    ///
    /// See Selectors Level 3 section 6.5.
    Hash {
        /// The selector being qualified.
        inner: Box<Selector>,
        /// The id value, without the `#`.
        id: String,
    },

    /// A class qualifier (`.note`).
    ///
    /// See Selectors Level 3 section 6.4.
    Class {
        /// The selector being qualified.
        inner: Box<Selector>,
        /// The class name, without the `.`.
        name: String,
    },

    /// An attribute qualifier (`[href]`, `[lang|=en]`, `[svg|width='10']`).
    ///
    /// See Selectors Level 3 section 6.3.
    Attrib {
        /// The selector being qualified.
        inner: Box<Selector>,
        /// Attribute namespace prefix; `None` for an unprefixed attribute.
        namespace: Option<String>,
        /// The attribute name.
        name: String,
        /// The comparison operator.
        operator: AttrOperator,
        /// The comparison value; `None` only for [`AttrOperator::Exists`].
        value: Option<String>,
    },

    /// A non-functional pseudo-class or pseudo-element (`:first-child`,
    /// `::before`).
    ///
    /// See Selectors Level 3 section 6.6.
    Pseudo {
        /// The selector being qualified.
        inner: Box<Selector>,
        /// Whether `:` or `::` introduced the qualifier.
        marker: PseudoMarker,
        /// The pseudo identifier, without the marker.
        name: String,
    },

    /// A functional pseudo-class (`:nth-child(2n+1)`, `:not(.hidden)`).
    Function {
        /// The selector being qualified.
        inner: Box<Selector>,
        /// Whether `:` or `::` introduced the qualifier.
        marker: PseudoMarker,
        /// The function identifier, without marker or parentheses.
        name: String,
        /// The single argument between the parentheses.
        argument: FunctionArgument,
    },

    /// Two selectors joined by a combinator (`div > p`).
    ///
    /// See Selectors Level 3 section 8.
    Combined {
        /// The left-hand selector (everything parsed so far).
        left: Box<Selector>,
        /// The combinator between the two.
        combinator: Combinator,
        /// The right-hand simple selector.
        right: Box<Selector>,
    },

    /// A comma-separated selector group (`h1, h2`).
    ///
    /// The parser only ever produces this at the top level.
    Or {
        /// The alternatives in source order; never empty.
        alternatives: Vec<Selector>,
    },
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element {
                namespace: Some(ns),
                name,
            } => write!(f, "{ns}|{name}"),
            Self::Element {
                namespace: None,
                name,
            } => f.write_str(name),
            Self::Hash { inner, id } => write!(f, "{inner}#{id}"),
            Self::Class { inner, name } => write!(f, "{inner}.{name}"),
            Self::Attrib {
                inner,
                namespace,
                name,
                operator,
                value,
            } => {
                write!(f, "{inner}[")?;
                if let Some(ns) = namespace {
                    write!(f, "{ns}|")?;
                }
                f.write_str(name)?;
                if *operator != AttrOperator::Exists {
                    write!(f, "{operator}'{}'", value.as_deref().unwrap_or_default())?;
                }
                f.write_str("]")
            }
            Self::Pseudo {
                inner,
                marker,
                name,
            } => write!(f, "{inner}{marker}{name}"),
            Self::Function {
                inner,
                marker,
                name,
                argument,
            } => write!(f, "{inner}{marker}{name}({argument})"),
            Self::Combined {
                left,
                combinator,
                right,
            } => match combinator {
                Combinator::Descendant => write!(f, "{left} {right}"),
                other => write!(f, "{left} {other} {right}"),
            },
            Self::Or { alternatives } => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                Ok(())
            }
        }
    }
}

/// The comparison operator of an attribute qualifier.
///
/// See Selectors Level 3 section 6.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrOperator {
    /// Bare `[attr]`: the attribute exists, any value.
    Exists,
    /// `=`: exact value match.
    Equals,
    /// `!=`: value differs or the attribute is absent. Not CSS syntax, but
    /// widely supported by selector engines.
    NotEquals,
    /// `~=`: one of the whitespace-separated words equals the value.
    Includes,
    /// `|=`: exact match, or prefix match followed by `-`.
    DashMatch,
    /// `^=`: the attribute value starts with the given value.
    PrefixMatch,
    /// `$=`: the attribute value ends with the given value.
    SuffixMatch,
    /// `*=`: the attribute value contains the given value.
    SubstringMatch,
}

impl AttrOperator {
    /// Returns the operator as written in selector syntax.
    ///
    /// [`AttrOperator::Exists`] has no written form and renders as the empty
    /// string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "",
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::PrefixMatch => "^=",
            Self::SuffixMatch => "$=",
            Self::SubstringMatch => "*=",
        }
    }

    /// Parses an operator token into an `AttrOperator` variant.
    ///
    /// Returns `None` if the token is not a recognized attribute operator.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(Self::Equals),
            "!=" => Some(Self::NotEquals),
            "~=" => Some(Self::Includes),
            "|=" => Some(Self::DashMatch),
            "^=" => Some(Self::PrefixMatch),
            "$=" => Some(Self::SuffixMatch),
            "*=" => Some(Self::SubstringMatch),
            _ => None,
        }
    }
}

impl fmt::Display for AttrOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The combinator joining two selectors.
///
/// See Selectors Level 3 section 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace between selectors: matches any descendant.
    Descendant,
    /// `>`: matches direct children only.
    Child,
    /// `+`: matches the immediately following sibling.
    DirectAdjacent,
    /// `~`: matches any following sibling.
    IndirectAdjacent,
}

impl Combinator {
    /// Returns the combinator as written in selector syntax.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::DirectAdjacent => "+",
            Self::IndirectAdjacent => "~",
        }
    }

    /// Parses a combinator token into a `Combinator` variant.
    ///
    /// Returns `None` if the string is not a recognized combinator.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            " " => Some(Self::Descendant),
            ">" => Some(Self::Child),
            "+" => Some(Self::DirectAdjacent),
            "~" => Some(Self::IndirectAdjacent),
            _ => None,
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The marker that introduced a pseudo qualifier.
///
/// Selectors Level 3 writes pseudo-classes with `:` and pseudo-elements
/// with `::`. Translation treats both alike, but the parsed form keeps the
/// distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoMarker {
    /// A single `:`.
    Colon,
    /// A double `::`.
    DoubleColon,
}

impl PseudoMarker {
    /// Returns the marker as written in selector syntax.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Colon => ":",
            Self::DoubleColon => "::",
        }
    }

    /// Parses a marker token into a `PseudoMarker` variant.
    ///
    /// Returns `None` if the string is neither `:` nor `::`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ":" => Some(Self::Colon),
            "::" => Some(Self::DoubleColon),
            _ => None,
        }
    }
}

impl fmt::Display for PseudoMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The argument of a functional pseudo-class.
///
/// An `an+b` series such as `2n+1` or `odd` arrives as
/// [`FunctionArgument::Selector`] wrapping a [`Selector::Element`] whose
/// name is the series text: the tokenizer emits the shorthand as a single
/// symbol, and the argument parser falls through to the nested-selector
/// form for any symbol that is not an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionArgument {
    /// A bare integer literal (`:nth-child(2)`).
    Integer(i64),
    /// A quoted string literal (`:contains('text')`).
    String(String),
    /// A nested simple selector (`:not(.hidden)`), or an `an+b` series
    /// captured as an element name.
    Selector(Box<Selector>),
}

impl fmt::Display for FunctionArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "'{value}'"),
            Self::Selector(selector) => selector.fmt(f),
        }
    }
}
