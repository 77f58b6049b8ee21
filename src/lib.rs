//! # cssoxide
//!
//! A compiler from CSS Level 3 selector expressions
//! (<https://www.w3.org/TR/selectors-3/>) to XPath 1.0 query strings
//! (<https://www.w3.org/TR/xpath-10/>), so a document tree with an XPath
//! evaluator can be queried with CSS syntax without a native selector
//! matching engine.
//!
//! The pipeline is selector text → [`lexer::Tokenizer`] →
//! [`stream::TokenStream`] → [`parser::parse`] → [`ast::Selector`] →
//! per-node translation into [`xpath::XPathExpr`] fragments → the final
//! query string.
//!
//! ## Quick Start
//!
//! ```
//! let xpath = cssoxide::compile("div.note > p").unwrap();
//! assert_eq!(
//!     xpath,
//!     "descendant-or-self::div[contains(concat(' ', normalize-space(@class), ' '), ' note ')]/p"
//! );
//! ```
//!
//! To run compiled queries against a host tree, implement
//! [`XPathDocument`] for it and use [`select`]. Selectors using
//! `:contains()` additionally need the `css:lower-case` extension function
//! registered with the host evaluator through [`register_functions`] before
//! the first query runs.
//!
//! ## Known Limitations
//!
//! - String values are quoted without embedded-quote escaping; a value
//!   containing `'` produces a malformed query.
//! - `:first-child`, `:first-of-type`, and the `+` combinator emit
//!   zero-based position tests (`position() = 0`, `[0]`), which 1-based
//!   XPath evaluators never satisfy; the renderings are kept verbatim for
//!   output compatibility with existing consumers.
//! - `:not()` accepts a single simple selector and negates only its
//!   accumulated condition, dropping any element-path narrowing.
//! - A comma group is a sum, not a set union: nodes matched by several
//!   alternatives appear once per alternative.
//! - CSS Level 4 selectors (`:has`, `:is`, `:where`) are not recognized.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod select;
pub mod series;
pub mod stream;
pub mod translate;
pub mod xpath;

pub use ast::{AttrOperator, Combinator, FunctionArgument, PseudoMarker, Selector};
pub use error::{Error, SyntaxError, TranslationError};
pub use parser::parse;
pub use select::{register_functions, select, FunctionNamespace, SelectError, XPathDocument};
pub use translate::DEFAULT_CONTEXT_PREFIX;

/// Compiles a CSS selector to an XPath query string with the default
/// context prefix, [`DEFAULT_CONTEXT_PREFIX`].
///
/// # Errors
///
/// Returns [`Error::Syntax`] when the selector does not parse and
/// [`Error::Translation`] when it parses but has no XPath 1.0 rendering.
///
/// # Examples
///
/// ```
/// assert_eq!(cssoxide::compile("#main").unwrap(), "descendant-or-self::*[@id = 'main']");
/// assert!(cssoxide::compile("a:hover").is_err());
/// ```
pub fn compile(selector: &str) -> Result<String, Error> {
    compile_with_prefix(selector, DEFAULT_CONTEXT_PREFIX)
}

/// Compiles a CSS selector to an XPath query string, prepending `prefix` to
/// every top-level alternative's element path.
///
/// An empty prefix yields a context-node-relative query; `"//"` anchors at
/// the document root.
///
/// # Errors
///
/// Returns [`Error::Syntax`] when the selector does not parse and
/// [`Error::Translation`] when it parses but has no XPath 1.0 rendering.
pub fn compile_with_prefix(selector: &str, prefix: &str) -> Result<String, Error> {
    let ast = parse(selector)?;
    Ok(ast.to_xpath_with_prefix(prefix)?)
}
