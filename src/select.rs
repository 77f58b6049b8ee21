//! Selecting nodes from a host document tree.
//!
//! This crate translates selectors but does not store trees or evaluate
//! XPath; both live on the host side behind two traits. [`XPathDocument`]
//! is the query seam: any tree exposing an XPath-1.0-compatible evaluator
//! can implement it and get [`select`] for free. [`FunctionNamespace`] is
//! the registration seam for the one extension function `:contains()`
//! needs.
//!
//! Registration is an explicit host-side initialization step, not a side
//! effect of loading this crate: call [`register_functions`] once before the
//! first `:contains()` query runs. The registration is idempotent and never
//! torn down.

use std::fmt;

use crate::error::Error;

/// A host document tree with an XPath 1.0 evaluator.
pub trait XPathDocument {
    /// The host's node handle.
    type Node;
    /// The host's evaluation error.
    type Error;

    /// Evaluates an XPath expression relative to `context`, returning the
    /// matched nodes in evaluator order.
    ///
    /// # Errors
    ///
    /// Returns the host's error for an expression its evaluator rejects.
    fn evaluate(&self, context: &Self::Node, xpath: &str) -> Result<Vec<Self::Node>, Self::Error>;

    /// Returns `true` when the node is an element (not text, attribute, or
    /// comment).
    fn is_element(&self, node: &Self::Node) -> bool;
}

/// A host registry for XPath extension functions.
pub trait FunctionNamespace {
    /// Registers a string-to-string function under `namespace:name`.
    fn register_string_function(&mut self, namespace: &str, name: &str, function: fn(&str) -> String);
}

/// Registers the `css:lower-case` extension function with the host.
///
/// `:contains()` compiles to a call of `css:lower-case(string(.))`, so this
/// must run before the first such query executes. Registering more than once
/// installs the same function again and is harmless.
pub fn register_functions<R: FunctionNamespace>(registry: &mut R) {
    registry.register_string_function("css", "lower-case", lower_case);
}

/// Unicode lowercasing, the function body behind `css:lower-case`.
fn lower_case(value: &str) -> String {
    value.to_lowercase()
}

/// An error from [`select`]: either the selector failed on this side, or
/// the host evaluator rejected the compiled query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError<E> {
    /// Selector parsing or translation failed.
    Selector(Error),
    /// The host evaluator returned an error.
    Evaluation(E),
}

impl<E: fmt::Display> fmt::Display for SelectError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(err) => err.fmt(f),
            Self::Evaluation(err) => write!(f, "xpath evaluation failed: {err}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for SelectError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Selector(err) => Some(err),
            Self::Evaluation(err) => Some(err),
        }
    }
}

impl<E> From<Error> for SelectError<E> {
    fn from(err: Error) -> Self {
        Self::Selector(err)
    }
}

/// Selects the elements under `root` matching a CSS selector.
///
/// Compiles the selector with the default context prefix, evaluates it
/// through the host, and filters non-element nodes out of the raw result
/// set, preserving evaluator order.
///
/// # Errors
///
/// Returns [`SelectError::Selector`] when the selector does not compile and
/// [`SelectError::Evaluation`] when the host evaluator fails.
pub fn select<D: XPathDocument>(
    doc: &D,
    root: &D::Node,
    selector: &str,
) -> Result<Vec<D::Node>, SelectError<D::Error>> {
    let xpath = crate::compile(selector)?;
    let nodes = doc
        .evaluate(root, &xpath)
        .map_err(SelectError::Evaluation)?;
    Ok(nodes
        .into_iter()
        .filter(|node| doc.is_element(node))
        .collect())
}
