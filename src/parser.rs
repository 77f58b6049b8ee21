//! Recursive descent parser for CSS selector expressions.
//!
//! This module implements the Selectors Level 3 grammar
//! (<https://www.w3.org/TR/selectors-3/#grammar>) over the token stream
//! produced by [`crate::lexer::Tokenizer`]. Each grammar production is a free
//! function taking the stream.
//!
//! # Grammar
//!
//! ```text
//! selector_group   = selector (',' selector)*
//! selector         = simple_selector ([combinator] simple_selector)*
//! combinator       = '+' | '>' | '~' | <whitespace>
//! simple_selector  = [element] qualifier*
//! element          = ('*' | Symbol) ['|' ('*' | Symbol)]
//! qualifier        = '#' Symbol | '.' Symbol | '[' attrib ']'
//!                  | (':' | '::') Symbol ['(' argument ')']
//! attrib           = Symbol ['|' Symbol] [operator (Symbol | String)]
//! argument         = String | Integer | simple_selector
//! ```
//!
//! A selector with no element token gets the universal element (`*`, any
//! namespace) without consuming anything, so `.note` parses the same as
//! `*.note`. Combinator chains are left-associative; whitespace between
//! simple selectors is the descendant combinator.

use crate::ast::{AttrOperator, Combinator, FunctionArgument, PseudoMarker, Selector};
use crate::error::SyntaxError;
use crate::lexer::{Token, Tokenizer};
use crate::stream::TokenStream;

/// Parses a CSS selector expression into a [`Selector`] AST.
///
/// A comma-separated group with two or more alternatives is wrapped in
/// [`Selector::Or`]; a single selector is returned bare. Empty input parses
/// as the universal selector.
///
/// # Errors
///
/// Returns [`SyntaxError`] on any grammar violation. The error message is
/// annotated with the full consumed/remaining token context, in the form
/// `"<message> at '<consumed>' -> '<remaining>'"`.
///
/// # Examples
///
/// ```
/// use cssoxide::ast::Selector;
///
/// let selector = cssoxide::parse("div > p.note").unwrap();
/// assert!(matches!(selector, Selector::Combined { .. }));
///
/// assert!(cssoxide::parse("a[href").is_err());
/// ```
pub fn parse(text: &str) -> Result<Selector, SyntaxError> {
    let mut stream = TokenStream::new(Tokenizer::new(text));
    parse_complete(&mut stream).map_err(|err| annotate(err, &mut stream))
}

/// Parses a selector group and requires the stream to be exhausted.
fn parse_complete(stream: &mut TokenStream) -> Result<Selector, SyntaxError> {
    let selector = parse_selector_group(stream)?;
    if let Some(token) = stream.peek()? {
        return Err(SyntaxError::new(
            format!("unexpected token '{token}' after selector"),
            token.position,
        ));
    }
    Ok(selector)
}

/// Re-annotates a syntax error with the consumed/remaining token context.
fn annotate(mut err: SyntaxError, stream: &mut TokenStream) -> SyntaxError {
    let consumed = render_tokens(stream.consumed());
    let remaining = render_tokens(&stream.drain_remaining());
    err.message = format!("{} at '{consumed}' -> '{remaining}'", err.message);
    err
}

/// Renders a token slice for diagnostics.
fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `selector_group = selector (',' selector)*`
fn parse_selector_group(stream: &mut TokenStream) -> Result<Selector, SyntaxError> {
    let mut alternatives = vec![parse_selector(stream)?];
    while next_is(stream, ",")? {
        stream.advance()?;
        alternatives.push(parse_selector(stream)?);
    }
    // A single selector is returned bare; `Or` is reserved for real comma
    // groups.
    if alternatives.len() == 1 {
        return Ok(alternatives.swap_remove(0));
    }
    Ok(Selector::Or { alternatives })
}

/// `selector = simple_selector ([combinator] simple_selector)*`
///
/// Stops at end of stream, `,`, or `)`. Left-associative.
fn parse_selector(stream: &mut TokenStream) -> Result<Selector, SyntaxError> {
    let mut result = parse_simple_selector(stream)?;
    loop {
        let explicit = match stream.peek()? {
            None => return Ok(result),
            Some(token) if token.is_punctuation(",") || token.is_punctuation(")") => {
                return Ok(result)
            }
            Some(token) if token.kind == crate::lexer::TokenKind::Punctuation => {
                match token.text.as_str() {
                    "+" => Some(Combinator::DirectAdjacent),
                    ">" => Some(Combinator::Child),
                    "~" => Some(Combinator::IndirectAdjacent),
                    _ => None,
                }
            }
            Some(_) => None,
        };
        let combinator = match explicit {
            Some(combinator) => {
                stream.advance()?;
                combinator
            }
            // Any other upcoming token means the descendant combinator.
            None => Combinator::Descendant,
        };
        let before = stream.consumed().len();
        let right = parse_simple_selector(stream)?;
        if stream.consumed().len() == before {
            // The next token starts no simple selector; without this check a
            // stray `]` would spin forever on implied universal selectors.
            let position = stream.position();
            let token = stream.peek()?.map_or_else(String::new, ToString::to_string);
            return Err(SyntaxError::new(
                format!("unexpected token '{token}'"),
                position,
            ));
        }
        result = Selector::Combined {
            left: Box::new(result),
            combinator,
            right: Box::new(right),
        };
    }
}

/// `simple_selector = [element] qualifier*`
fn parse_simple_selector(stream: &mut TokenStream) -> Result<Selector, SyntaxError> {
    let mut result = parse_element(stream)?;
    let mut has_hash = false;

    loop {
        let qualifier = match stream.peek()? {
            Some(token) if token.is_punctuation("#") => Qualifier::Hash,
            Some(token) if token.is_punctuation(".") => Qualifier::Class,
            Some(token) if token.is_punctuation("[") => Qualifier::Attrib,
            Some(token) if token.is_punctuation(":") => Qualifier::Pseudo(PseudoMarker::Colon),
            Some(token) if token.is_punctuation("::") => {
                Qualifier::Pseudo(PseudoMarker::DoubleColon)
            }
            _ => return Ok(result),
        };

        match qualifier {
            Qualifier::Hash => {
                let marker = stream.advance()?;
                if has_hash {
                    return Err(SyntaxError::new(
                        "only one '#' qualifier is allowed per simple selector",
                        marker.map_or(0, |t| t.position),
                    ));
                }
                let id = require_symbol(stream, "an id after '#'")?;
                result = Selector::Hash {
                    inner: Box::new(result),
                    id: id.text,
                };
                has_hash = true;
            }
            Qualifier::Class => {
                stream.advance()?;
                let name = require_symbol(stream, "a class name after '.'")?;
                result = Selector::Class {
                    inner: Box::new(result),
                    name: name.text,
                };
            }
            Qualifier::Attrib => {
                stream.advance()?;
                result = parse_attrib(result, stream)?;
                require_punctuation(stream, "]")?;
            }
            Qualifier::Pseudo(marker) => {
                stream.advance()?;
                let name = require_symbol(stream, "a pseudo-class name")?;
                if next_is(stream, "(")? {
                    stream.advance()?;
                    let argument = parse_function_argument(stream)?;
                    require_punctuation(stream, ")")?;
                    result = Selector::Function {
                        inner: Box::new(result),
                        marker,
                        name: name.text,
                        argument,
                    };
                } else {
                    result = Selector::Pseudo {
                        inner: Box::new(result),
                        marker,
                        name: name.text,
                    };
                }
            }
        }
    }
}

/// The qualifier selected by one token of lookahead.
enum Qualifier {
    Hash,
    Class,
    Attrib,
    Pseudo(PseudoMarker),
}

/// `element = ('*' | Symbol) ['|' ('*' | Symbol)]`
///
/// If the upcoming token is neither `*` nor a symbol, nothing is consumed
/// and the universal element is assumed.
fn parse_element(stream: &mut TokenStream) -> Result<Selector, SyntaxError> {
    let starts_element = matches!(
        stream.peek()?,
        Some(token) if token.is_punctuation("*") || token.is_symbol()
    );
    if !starts_element {
        return Ok(Selector::Element {
            namespace: None,
            name: "*".to_string(),
        });
    }

    let first = require_token(stream, "an element name")?;
    if next_is(stream, "|")? {
        stream.advance()?;
        let name = require_token(stream, "an element name after '|'")?;
        if !(name.is_symbol() || name.is_punctuation("*")) {
            return Err(SyntaxError::new(
                format!("expected an element name after '|', got '{name}'"),
                name.position,
            ));
        }
        Ok(Selector::Element {
            namespace: wildcard_to_any(first.text),
            name: name.text,
        })
    } else {
        Ok(Selector::Element {
            namespace: None,
            name: first.text,
        })
    }
}

/// `attrib = Symbol ['|' Symbol] [operator (Symbol | String)]`
///
/// The opening `[` is already consumed and the closing `]` is left for the
/// caller.
fn parse_attrib(inner: Selector, stream: &mut TokenStream) -> Result<Selector, SyntaxError> {
    // The namespace half follows the element rule: a symbol or `*`.
    let first = require_token(stream, "an attribute name")?;
    if !(first.is_symbol() || first.is_punctuation("*")) {
        return Err(SyntaxError::new(
            format!("expected an attribute name, got '{first}'"),
            first.position,
        ));
    }
    let (namespace, name) = if next_is(stream, "|")? {
        stream.advance()?;
        let name = require_symbol(stream, "an attribute name after '|'")?;
        (wildcard_to_any(first.text), name.text)
    } else {
        (None, first.text)
    };

    if next_is(stream, "]")? {
        return Ok(Selector::Attrib {
            inner: Box::new(inner),
            namespace,
            name,
            operator: AttrOperator::Exists,
            value: None,
        });
    }

    let op = require_token(stream, "an attribute operator")?;
    let operator = AttrOperator::parse(&op.text).ok_or_else(|| {
        SyntaxError::new(
            format!("expected an attribute operator, got '{op}'"),
            op.position,
        )
    })?;
    let value = require_token(stream, "an attribute value")?;
    if !(value.is_symbol() || value.is_string()) {
        return Err(SyntaxError::new(
            format!("expected a string or symbol, got '{value}'"),
            value.position,
        ));
    }
    Ok(Selector::Attrib {
        inner: Box::new(inner),
        namespace,
        name,
        operator,
        value: Some(value.text),
    })
}

/// `argument = String | Integer | simple_selector`
///
/// A string token or an integer-valued symbol is taken directly; anything
/// else falls through to a nested simple selector, which is how `an+b`
/// series and `:not()` arguments arrive.
fn parse_function_argument(stream: &mut TokenStream) -> Result<FunctionArgument, SyntaxError> {
    enum Kind {
        String,
        Integer(i64),
        Selector,
    }
    let kind = match stream.peek()? {
        Some(token) if token.is_string() => Kind::String,
        Some(token) if token.is_symbol() => match token.text.parse::<i64>() {
            Ok(value) => Kind::Integer(value),
            Err(_) => Kind::Selector,
        },
        _ => Kind::Selector,
    };
    match kind {
        Kind::String => {
            let token = require_token(stream, "a function argument")?;
            Ok(FunctionArgument::String(token.text))
        }
        Kind::Integer(value) => {
            stream.advance()?;
            Ok(FunctionArgument::Integer(value))
        }
        Kind::Selector => {
            let selector = parse_simple_selector(stream)?;
            Ok(FunctionArgument::Selector(Box::new(selector)))
        }
    }
}

/// Maps the `*` namespace token to the any-namespace representation.
fn wildcard_to_any(namespace: String) -> Option<String> {
    if namespace == "*" {
        None
    } else {
        Some(namespace)
    }
}

/// Returns `true` if the upcoming token is the given punctuation.
fn next_is(stream: &mut TokenStream, text: &str) -> Result<bool, SyntaxError> {
    Ok(matches!(stream.peek()?, Some(token) if token.is_punctuation(text)))
}

/// Consumes and returns the upcoming token, erroring at end of stream.
fn require_token(stream: &mut TokenStream, what: &str) -> Result<Token, SyntaxError> {
    let position = stream.position();
    stream
        .advance()?
        .ok_or_else(|| SyntaxError::new(format!("expected {what}, got end of input"), position))
}

/// Consumes and returns the upcoming token, which must be a symbol.
fn require_symbol(stream: &mut TokenStream, what: &str) -> Result<Token, SyntaxError> {
    let token = require_token(stream, what)?;
    if token.is_symbol() {
        Ok(token)
    } else {
        Err(SyntaxError::new(
            format!("expected {what}, got '{token}'"),
            token.position,
        ))
    }
}

/// Consumes the upcoming token, which must be the given punctuation.
fn require_punctuation(stream: &mut TokenStream, text: &str) -> Result<(), SyntaxError> {
    let token = require_token(stream, &format!("'{text}'"))?;
    if token.is_punctuation(text) {
        Ok(())
    } else {
        Err(SyntaxError::new(
            format!("expected '{text}', got '{token}'"),
            token.position,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(input: &str) -> Selector {
        parse(input).unwrap()
    }

    fn element(name: &str) -> Selector {
        Selector::Element {
            namespace: None,
            name: name.to_string(),
        }
    }

    fn assert_parse_error(input: &str) {
        assert!(parse(input).is_err(), "expected parse error for {input:?}");
    }

    #[test]
    fn test_parse_element() {
        assert_eq!(p("div"), element("div"));
        assert_eq!(p("*"), element("*"));
    }

    #[test]
    fn test_parse_namespaced_element() {
        assert_eq!(
            p("svg|rect"),
            Selector::Element {
                namespace: Some("svg".to_string()),
                name: "rect".to_string(),
            }
        );
        // A `*` namespace means any namespace, same as no prefix at all.
        assert_eq!(p("*|div"), element("div"));
    }

    #[test]
    fn test_empty_input_is_the_universal_selector() {
        assert_eq!(p(""), element("*"));
    }

    #[test]
    fn test_parse_qualifiers_wrap_inside_out() {
        assert_eq!(
            p("div.note#main"),
            Selector::Hash {
                inner: Box::new(Selector::Class {
                    inner: Box::new(element("div")),
                    name: "note".to_string(),
                }),
                id: "main".to_string(),
            }
        );
    }

    #[test]
    fn test_qualifier_without_element_gets_universal() {
        assert_eq!(
            p(".note"),
            Selector::Class {
                inner: Box::new(element("*")),
                name: "note".to_string(),
            }
        );
        assert_eq!(
            p("#main"),
            Selector::Hash {
                inner: Box::new(element("*")),
                id: "main".to_string(),
            }
        );
    }

    #[test]
    fn test_second_hash_is_an_error() {
        assert_parse_error("div#a#b");
    }

    #[test]
    fn test_parse_attrib_forms() {
        assert_eq!(
            p("a[href]"),
            Selector::Attrib {
                inner: Box::new(element("a")),
                namespace: None,
                name: "href".to_string(),
                operator: AttrOperator::Exists,
                value: None,
            }
        );
        assert_eq!(
            p("a[rel~='nofollow']"),
            Selector::Attrib {
                inner: Box::new(element("a")),
                namespace: None,
                name: "rel".to_string(),
                operator: AttrOperator::Includes,
                value: Some("nofollow".to_string()),
            }
        );
        // Unquoted symbol values are accepted too.
        assert_eq!(
            p("p[lang|=en]"),
            Selector::Attrib {
                inner: Box::new(element("p")),
                namespace: None,
                name: "lang".to_string(),
                operator: AttrOperator::DashMatch,
                value: Some("en".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_namespaced_attrib() {
        assert_eq!(
            p("[xml|lang=en]"),
            Selector::Attrib {
                inner: Box::new(element("*")),
                namespace: Some("xml".to_string()),
                name: "lang".to_string(),
                operator: AttrOperator::Equals,
                value: Some("en".to_string()),
            }
        );
    }

    #[test]
    fn test_attrib_wildcard_namespace() {
        // `*|` means any namespace, same as on an element.
        assert_eq!(
            p("[*|lang]"),
            Selector::Attrib {
                inner: Box::new(element("*")),
                namespace: None,
                name: "lang".to_string(),
                operator: AttrOperator::Exists,
                value: None,
            }
        );
        assert_eq!(
            p("a[*|lang='en']"),
            Selector::Attrib {
                inner: Box::new(element("a")),
                namespace: None,
                name: "lang".to_string(),
                operator: AttrOperator::Equals,
                value: Some("en".to_string()),
            }
        );
    }

    #[test]
    fn test_attrib_errors() {
        assert_parse_error("a[href");
        assert_parse_error("a[href=");
        assert_parse_error("a[href==x]");
        assert_parse_error("a[href>x]");
        assert_parse_error("a[]");
    }

    #[test]
    fn test_parse_combinators() {
        assert_eq!(
            p("div > p"),
            Selector::Combined {
                left: Box::new(element("div")),
                combinator: Combinator::Child,
                right: Box::new(element("p")),
            }
        );
        assert_eq!(
            p("div p"),
            Selector::Combined {
                left: Box::new(element("div")),
                combinator: Combinator::Descendant,
                right: Box::new(element("p")),
            }
        );
        assert_eq!(
            p("div + p"),
            Selector::Combined {
                left: Box::new(element("div")),
                combinator: Combinator::DirectAdjacent,
                right: Box::new(element("p")),
            }
        );
        assert_eq!(
            p("div ~ p"),
            Selector::Combined {
                left: Box::new(element("div")),
                combinator: Combinator::IndirectAdjacent,
                right: Box::new(element("p")),
            }
        );
    }

    #[test]
    fn test_combinators_are_left_associative() {
        assert_eq!(
            p("a > b c"),
            Selector::Combined {
                left: Box::new(Selector::Combined {
                    left: Box::new(element("a")),
                    combinator: Combinator::Child,
                    right: Box::new(element("b")),
                }),
                combinator: Combinator::Descendant,
                right: Box::new(element("c")),
            }
        );
    }

    #[test]
    fn test_qualifier_after_space_attaches_to_a_new_simple_selector() {
        // `div .foo` is universal-with-class under a descendant combinator.
        assert_eq!(
            p("div .foo"),
            Selector::Combined {
                left: Box::new(element("div")),
                combinator: Combinator::Descendant,
                right: Box::new(Selector::Class {
                    inner: Box::new(element("*")),
                    name: "foo".to_string(),
                }),
            }
        );
    }

    #[test]
    fn test_parse_selector_group() {
        assert_eq!(
            p("h1, h2"),
            Selector::Or {
                alternatives: vec![element("h1"), element("h2")],
            }
        );
        // A single selector is returned bare.
        assert!(!matches!(p("h1"), Selector::Or { .. }));
    }

    #[test]
    fn test_trailing_comma_grows_a_universal_alternative() {
        assert_eq!(
            p("a,"),
            Selector::Or {
                alternatives: vec![element("a"), element("*")],
            }
        );
    }

    #[test]
    fn test_parse_pseudo() {
        assert_eq!(
            p("a:first-child"),
            Selector::Pseudo {
                inner: Box::new(element("a")),
                marker: PseudoMarker::Colon,
                name: "first-child".to_string(),
            }
        );
        assert_eq!(
            p("p::before"),
            Selector::Pseudo {
                inner: Box::new(element("p")),
                marker: PseudoMarker::DoubleColon,
                name: "before".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_function_arguments() {
        assert_eq!(
            p("li:nth-child(2)"),
            Selector::Function {
                inner: Box::new(element("li")),
                marker: PseudoMarker::Colon,
                name: "nth-child".to_string(),
                argument: FunctionArgument::Integer(2),
            }
        );
        assert_eq!(
            p("a:contains('link')"),
            Selector::Function {
                inner: Box::new(element("a")),
                marker: PseudoMarker::Colon,
                name: "contains".to_string(),
                argument: FunctionArgument::String("link".to_string()),
            }
        );
        // A series shorthand arrives as a nested element selector.
        assert_eq!(
            p("li:nth-child(2n+1)"),
            Selector::Function {
                inner: Box::new(element("li")),
                marker: PseudoMarker::Colon,
                name: "nth-child".to_string(),
                argument: FunctionArgument::Selector(Box::new(element("2n+1"))),
            }
        );
        assert_eq!(
            p("p:not(.hidden)"),
            Selector::Function {
                inner: Box::new(element("p")),
                marker: PseudoMarker::Colon,
                name: "not".to_string(),
                argument: FunctionArgument::Selector(Box::new(Selector::Class {
                    inner: Box::new(element("*")),
                    name: "hidden".to_string(),
                })),
            }
        );
    }

    #[test]
    fn test_function_must_close() {
        assert_parse_error("li:nth-child(2");
        assert_parse_error("a:contains('x'");
        assert_parse_error("p:not(.hidden");
    }

    #[test]
    fn test_pseudo_needs_an_identifier() {
        assert_parse_error("a:");
        assert_parse_error("a:.b");
    }

    #[test]
    fn test_trailing_tokens_are_an_error() {
        assert_parse_error("a]");
        assert_parse_error("a)b");
    }

    #[test]
    fn test_error_is_annotated_with_token_context() {
        let err = parse("div > p[").unwrap_err();
        assert!(err.message.contains(" at "), "got: {}", err.message);
        assert!(err.message.contains("div > p ["), "got: {}", err.message);
        assert!(err.message.contains("->"), "got: {}", err.message);
    }

    #[test]
    fn test_tokenizer_errors_surface_as_syntax_errors() {
        assert_parse_error("a[href=\"x]");
        assert_parse_error("a @ b");
    }
}
