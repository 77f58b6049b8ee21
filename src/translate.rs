//! Selector AST to XPath 1.0 translation.
//!
//! Each [`Selector`] node translates inside-out: the wrapped selector
//! compiles first and the node refines the resulting [`XPathExpr`]. One
//! exhaustive `match` holds every translation rule, and static tables hold
//! the pseudo-class identifiers that are recognized but untranslatable, so
//! "unsupported" and "unknown" stay distinct errors.
//!
//! Several renderings are preserved from long-standing selector-to-XPath
//! practice even where they look off:
//!
//! - `:first-child`, `:first-of-type`, and the `+` combinator test
//!   zero-based positions (`position() = 0`, index `[0]`) although XPath
//!   positions are 1-based, so they never match.
//! - `:only-of-type` applies `node-name(.)` inside `count(..)`, which is
//!   structurally approximate at best.
//! - `:not()` negates only the nested selector's accumulated condition and
//!   drops its path narrowing, so `:not(div.x)` means `:not(.x)`.

use std::fmt::Write;

use crate::ast::{AttrOperator, Combinator, FunctionArgument, Selector};
use crate::error::TranslationError;
use crate::series;
use crate::xpath::{literal, XPathExpr};

/// The axis prefix applied to every top-level alternative by default,
/// anchoring the query at the context node and its subtree.
pub const DEFAULT_CONTEXT_PREFIX: &str = "descendant-or-self::";

/// Pseudo-classes that are recognized but have no XPath 1.0 rendering,
/// mostly because they depend on user interaction or presentation state.
const UNSUPPORTED_PSEUDOS: &[&str] = &[
    "indeterminate",
    "first-line",
    "first-letter",
    "selection",
    "before",
    "after",
    "link",
    "visited",
    "active",
    "focus",
    "hover",
];

/// Functional pseudo-classes that are recognized but untranslatable.
const UNSUPPORTED_FUNCTIONS: &[&str] = &["target", "lang", "enabled", "disabled"];

impl Selector {
    /// Compiles this selector to an XPath string with the default context
    /// prefix.
    ///
    /// Translation is pure: compiling the same AST twice yields identical
    /// output.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] when the selector has no XPath 1.0
    /// rendering.
    pub fn to_xpath(&self) -> Result<String, TranslationError> {
        self.to_xpath_with_prefix(DEFAULT_CONTEXT_PREFIX)
    }

    /// Compiles this selector to an XPath string, prepending `prefix` to
    /// every top-level alternative's element path.
    ///
    /// Alternatives of a top-level [`Selector::Or`] compile independently
    /// and are joined with `" | "`. The join is a sum, not a set union:
    /// a node matched by several alternatives appears once per match.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] when the selector has no XPath 1.0
    /// rendering.
    pub fn to_xpath_with_prefix(&self, prefix: &str) -> Result<String, TranslationError> {
        let fragments = match self {
            Self::Or { alternatives } => alternatives
                .iter()
                .map(translate)
                .collect::<Result<Vec<_>, _>>()?,
            other => vec![translate(other)?],
        };
        Ok(fragments
            .into_iter()
            .map(|fragment| fragment.prefixed(prefix).to_string())
            .collect::<Vec<_>>()
            .join(" | "))
    }
}

/// Translates one selector node (below any top-level `Or`) to a fragment.
fn translate(selector: &Selector) -> Result<XPathExpr, TranslationError> {
    match selector {
        Selector::Element { namespace, name } => Ok(translate_element(namespace.as_deref(), name)),

        Selector::Hash { inner, id } => {
            Ok(translate(inner)?.with_condition(format!("@id = {}", literal(id))))
        }

        Selector::Class { inner, name } => {
            Ok(translate(inner)?.with_condition(class_condition("@class", name)))
        }

        Selector::Attrib {
            inner,
            namespace,
            name,
            operator,
            value,
        } => {
            let expr = translate(inner)?;
            let reference = match namespace {
                Some(ns) => format!("@{ns}:{name}"),
                None => format!("@{name}"),
            };
            let value = value.as_deref().unwrap_or_default();
            Ok(expr.with_condition(attrib_condition(&reference, *operator, value)))
        }

        Selector::Pseudo {
            inner,
            marker: _,
            name,
        } => translate_pseudo(translate(inner)?, name),

        Selector::Function {
            inner,
            marker: _,
            name,
            argument,
        } => translate_function(translate(inner)?, name, argument),

        Selector::Combined {
            left,
            combinator,
            right,
        } => {
            let left = translate(left)?;
            let right = translate(right)?;
            Ok(translate_combined(&left, *combinator, &right))
        }

        // The parser only builds `Or` at the top level, where
        // `to_xpath_with_prefix` unpacks it. Reaching one here means a
        // hand-built AST nested a selector list, which no single location
        // path can express.
        Selector::Or { .. } => Err(TranslationError::NestedSelectorList),
    }
}

/// Element test: lowercased bare name for any namespace, `ns:name` with the
/// case preserved for an explicit prefix.
fn translate_element(namespace: Option<&str>, name: &str) -> XPathExpr {
    match namespace {
        Some(ns) => XPathExpr::new(format!("{ns}:{name}")),
        None => XPathExpr::new(name.to_lowercase()),
    }
}

/// Token-boundary containment over a whitespace-separated attribute value.
///
/// XPath 1.0 has no word-match function, so the attribute is normalized and
/// padded with spaces and the needle is searched with its own padding.
fn class_condition(reference: &str, name: &str) -> String {
    format!(
        "contains(concat(' ', normalize-space({reference}), ' '), {})",
        literal(&format!(" {name} "))
    )
}

/// The condition for one attribute operator applied to `reference`.
fn attrib_condition(reference: &str, operator: AttrOperator, value: &str) -> String {
    match operator {
        AttrOperator::Exists => reference.to_string(),
        AttrOperator::Equals => format!("{reference} = {}", literal(value)),
        AttrOperator::NotEquals => {
            // An absent attribute also counts as "not equal", except when
            // comparing against the empty string.
            if value.is_empty() {
                format!("{reference} != {}", literal(value))
            } else {
                format!("not({reference}) or {reference} != {}", literal(value))
            }
        }
        AttrOperator::Includes => class_condition(reference, value),
        AttrOperator::DashMatch => format!(
            "{reference} = {} or starts-with({reference}, {})",
            literal(value),
            literal(&format!("{value}-"))
        ),
        AttrOperator::PrefixMatch => format!("starts-with({reference}, {})", literal(value)),
        AttrOperator::SuffixMatch => {
            // XPath 1.0 has starts-with but no ends-with, so the suffix is
            // cut with length arithmetic instead.
            let tail = suffix_offset(value);
            format!(
                "substring({reference}, string-length({reference})-{tail}) = {}",
                literal(value)
            )
        }
        AttrOperator::SubstringMatch => format!("contains({reference}, {})", literal(value)),
    }
}

/// `len(value) - 1` in chars, rendered as a plain integer (`-1` for the
/// empty value, which yields the `string-length(..)--1` rendering).
fn suffix_offset(value: &str) -> String {
    let len = value.chars().count();
    if len == 0 {
        "-1".to_string()
    } else {
        (len - 1).to_string()
    }
}

/// Dispatches a non-functional pseudo-class by identifier.
fn translate_pseudo(expr: XPathExpr, name: &str) -> Result<XPathExpr, TranslationError> {
    if UNSUPPORTED_PSEUDOS.contains(&name) {
        return Err(TranslationError::UnsupportedPseudoClass {
            name: name.to_string(),
        });
    }
    Ok(match name {
        "checked" => expr
            .with_condition("(@selected or @checked) and (name()='input' or name()='option')"),
        "first-child" => rewrap_as_child(expr).with_condition("position() = 0"),
        "last-child" => rewrap_as_child(expr).with_condition("position() = last()"),
        "first-of-type" => rewrap_as_child(expr).with_index(0),
        "last-of-type" => expr.with_index("last()"),
        "only-child" => expr.with_condition("count(..) = 1"),
        "only-of-type" => expr.with_condition("count(../node-name(.)) = 1"),
        "empty" => expr.with_condition("count(.) = 0 and string(.) = ''"),
        _ => {
            return Err(TranslationError::UnknownPseudoClass {
                name: name.to_string(),
            })
        }
    })
}

/// Dispatches a functional pseudo-class by identifier.
fn translate_function(
    expr: XPathExpr,
    name: &str,
    argument: &FunctionArgument,
) -> Result<XPathExpr, TranslationError> {
    if UNSUPPORTED_FUNCTIONS.contains(&name) {
        return Err(TranslationError::UnsupportedPseudoClass {
            name: name.to_string(),
        });
    }
    match name {
        "nth-child" | "nth-of-type" => translate_nth(expr, argument, false),
        "nth-last-child" | "nth-last-of-type" => translate_nth(expr, argument, true),
        "contains" => {
            let text = argument_text(argument);
            Ok(expr.with_condition(format!(
                "contains(css:lower-case(string(.)), {})",
                literal(&text.to_lowercase())
            )))
        }
        "not" => translate_not(expr, argument),
        _ => Err(TranslationError::UnknownPseudoClass {
            name: name.to_string(),
        }),
    }
}

/// The four `nth-*` pseudo-classes share one series algebra.
fn translate_nth(
    expr: XPathExpr,
    argument: &FunctionArgument,
    last: bool,
) -> Result<XPathExpr, TranslationError> {
    let (a, b) = match argument {
        FunctionArgument::Integer(value) => return Ok(simple_index(expr, *value, last)),
        FunctionArgument::String(text) => {
            series::parse(text).ok_or_else(|| TranslationError::InvalidSeries {
                text: text.clone(),
            })?
        }
        FunctionArgument::Selector(selector) => {
            let text = selector.to_string();
            series::parse(&text).ok_or(TranslationError::InvalidSeries { text })?
        }
    };

    if a == 0 {
        // A zero step selects the fixed set {b}, which the general formula
        // cannot express; the original translation gives up and matches
        // nothing.
        return Ok(expr.with_condition("false()"));
    }
    if a == 1 {
        return Ok(simple_index(expr, b, last));
    }

    let adjusted = if b > 0 {
        (-b).to_string()
    } else {
        // unsigned_abs keeps i64::MIN from overflowing on negation.
        format!("+{}", b.unsigned_abs())
    };
    let mut condition = format!("(position() {adjusted}) mod {a} = 0");
    if b >= 0 {
        let _ = write!(condition, " and position() >= {b}");
    }
    Ok(expr.with_condition(condition))
}

/// Fixed 1-based index: rewrap as child-of-any-parent and index with
/// `value - 1`, counted from the end for the `-last-` variants.
fn simple_index(expr: XPathExpr, value: i64, last: bool) -> XPathExpr {
    // Saturating: i64::MIN is a legal argument token and must not overflow.
    let index = value.saturating_sub(1);
    let expr = rewrap_as_child(expr);
    if last {
        expr.with_index(format!("last() - {index}"))
    } else {
        expr.with_index(index)
    }
}

/// `:not()` negates only the nested selector's accumulated condition; any
/// path narrowing it introduced is dropped.
fn translate_not(
    expr: XPathExpr,
    argument: &FunctionArgument,
) -> Result<XPathExpr, TranslationError> {
    let FunctionArgument::Selector(selector) = argument else {
        return Err(TranslationError::InvalidArgument {
            function: "not".to_string(),
        });
    };
    let nested = translate(selector)?;
    Ok(match nested.condition() {
        Some(condition) => expr.with_condition(format!("not({condition})")),
        // Nothing accumulated, nothing to negate.
        None => expr,
    })
}

/// Rewraps a fully rendered fragment as a child of any parent (`*/...`),
/// putting the positional predicate into the parent's child list.
fn rewrap_as_child(expr: XPathExpr) -> XPathExpr {
    XPathExpr::new(format!("*/{expr}"))
}

/// Joins two fully rendered fragments with a combinator axis.
fn translate_combined(left: &XPathExpr, combinator: Combinator, right: &XPathExpr) -> XPathExpr {
    match combinator {
        Combinator::Descendant => XPathExpr::new(format!("{left}/descendant::{right}")),
        Combinator::Child => XPathExpr::new(format!("{left}/{right}")),
        Combinator::IndirectAdjacent => {
            XPathExpr::new(format!("{left}/following-sibling::{right}"))
        }
        Combinator::DirectAdjacent => {
            XPathExpr::new(format!("{left}/following-sibling::{right}")).with_index(0)
        }
    }
}

/// The textual form of a function argument, for `:contains()`.
fn argument_text(argument: &FunctionArgument) -> String {
    match argument {
        FunctionArgument::Integer(value) => value.to_string(),
        FunctionArgument::String(text) => text.clone(),
        FunctionArgument::Selector(selector) => selector.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parse;

    fn xpath(selector: &str) -> String {
        parse(selector).unwrap().to_xpath().unwrap()
    }

    fn translation_error(selector: &str) -> TranslationError {
        parse(selector).unwrap().to_xpath().unwrap_err()
    }

    #[test]
    fn test_element() {
        assert_eq!(xpath("div"), "descendant-or-self::div");
        assert_eq!(xpath("*"), "descendant-or-self::*");
        // Any-namespace names are lowercased; prefixed names keep their case.
        assert_eq!(xpath("DIV"), "descendant-or-self::div");
        assert_eq!(xpath("svg|Rect"), "descendant-or-self::svg:Rect");
    }

    #[test]
    fn test_hash_and_class() {
        assert_eq!(xpath("#main"), "descendant-or-self::*[@id = 'main']");
        assert_eq!(
            xpath("div.foo"),
            "descendant-or-self::div[contains(concat(' ', normalize-space(@class), ' '), ' foo ')]"
        );
    }

    #[test]
    fn test_attrib_operators() {
        assert_eq!(xpath("a[href]"), "descendant-or-self::a[@href]");
        assert_eq!(xpath("a[href='x']"), "descendant-or-self::a[@href = 'x']");
        assert_eq!(
            xpath("a[href!='x']"),
            "descendant-or-self::a[not(@href) or @href != 'x']"
        );
        assert_eq!(
            xpath("a[href!='']"),
            "descendant-or-self::a[@href != '']"
        );
        assert_eq!(
            xpath("a[rel~='nofollow']"),
            "descendant-or-self::a[contains(concat(' ', normalize-space(@rel), ' '), ' nofollow ')]"
        );
        assert_eq!(
            xpath("p[lang|='en']"),
            "descendant-or-self::p[@lang = 'en' or starts-with(@lang, 'en-')]"
        );
        assert_eq!(
            xpath("a[href^='http']"),
            "descendant-or-self::a[starts-with(@href, 'http')]"
        );
        assert_eq!(
            xpath("a[href$='pdf']"),
            "descendant-or-self::a[substring(@href, string-length(@href)-2) = 'pdf']"
        );
        assert_eq!(
            xpath("a[href*='example']"),
            "descendant-or-self::a[contains(@href, 'example')]"
        );
    }

    #[test]
    fn test_attrib_suffix_with_empty_value() {
        // len('') - 1 renders as -1, producing the double-minus.
        assert_eq!(
            xpath("a[href$='']"),
            "descendant-or-self::a[substring(@href, string-length(@href)--1) = '']"
        );
    }

    #[test]
    fn test_namespaced_attrib() {
        assert_eq!(
            xpath("[xml|lang='en']"),
            "descendant-or-self::*[@xml:lang = 'en']"
        );
    }

    #[test]
    fn test_combinators() {
        assert_eq!(xpath("div > p"), "descendant-or-self::div/p");
        assert_eq!(xpath("div p"), "descendant-or-self::div/descendant::p");
        assert_eq!(
            xpath("div ~ p"),
            "descendant-or-self::div/following-sibling::p"
        );
        assert_eq!(
            xpath("div + p"),
            "descendant-or-self::div/following-sibling::p[0]"
        );
    }

    #[test]
    fn test_selector_group_joins_with_union() {
        assert_eq!(
            xpath("a, b"),
            "descendant-or-self::a | descendant-or-self::b"
        );
        assert_eq!(
            xpath("h1.title, h2"),
            "descendant-or-self::h1[contains(concat(' ', normalize-space(@class), ' '), \
             ' title ')] | descendant-or-self::h2"
        );
    }

    #[test]
    fn test_positional_pseudos() {
        // Zero-based renderings preserved verbatim.
        assert_eq!(
            xpath("a:first-child"),
            "descendant-or-self::*/a[position() = 0]"
        );
        assert_eq!(
            xpath("a:last-child"),
            "descendant-or-self::*/a[position() = last()]"
        );
        assert_eq!(xpath("a:first-of-type"), "descendant-or-self::*/a[0]");
        assert_eq!(xpath("a:last-of-type"), "descendant-or-self::a[last()]");
        assert_eq!(xpath("a:only-child"), "descendant-or-self::a[count(..) = 1]");
        assert_eq!(
            xpath("a:only-of-type"),
            "descendant-or-self::a[count(../node-name(.)) = 1]"
        );
        assert_eq!(
            xpath("p:empty"),
            "descendant-or-self::p[count(.) = 0 and string(.) = '']"
        );
    }

    #[test]
    fn test_checked() {
        assert_eq!(
            xpath(":checked"),
            "descendant-or-self::*[(@selected or @checked) and (name()='input' or name()='option')]"
        );
    }

    #[test]
    fn test_nth_child_integer() {
        assert_eq!(xpath("li:nth-child(2)"), "descendant-or-self::*/li[1]");
        assert_eq!(
            xpath("li:nth-last-child(2)"),
            "descendant-or-self::*/li[last() - 1]"
        );
        assert_eq!(xpath("li:nth-of-type(3)"), "descendant-or-self::*/li[2]");
        assert_eq!(
            xpath("li:nth-last-of-type(1)"),
            "descendant-or-self::*/li[last() - 0]"
        );
        // Zero and negative indexes shift through unchanged.
        assert_eq!(xpath("li:nth-child(0)"), "descendant-or-self::*/li[-1]");
    }

    #[test]
    fn test_nth_child_series() {
        assert_eq!(
            xpath("li:nth-child(odd)"),
            "descendant-or-self::li[(position() -1) mod 2 = 0 and position() >= 1]"
        );
        assert_eq!(
            xpath("li:nth-child(even)"),
            "descendant-or-self::li[(position() +0) mod 2 = 0 and position() >= 0]"
        );
        assert_eq!(
            xpath("li:nth-child(3n+1)"),
            "descendant-or-self::li[(position() -1) mod 3 = 0 and position() >= 1]"
        );
        // Negative offsets skip the position floor.
        assert_eq!(
            xpath("li:nth-child(3n-2)"),
            "descendant-or-self::li[(position() +2) mod 3 = 0]"
        );
        // a = 1 falls back to the fixed-index form with b.
        assert_eq!(xpath("li:nth-child(n+3)"), "descendant-or-self::*/li[2]");
    }

    #[test]
    fn test_nth_child_zero_step_matches_nothing() {
        assert_eq!(xpath("li:nth-child(0n+3)"), "descendant-or-self::li[false()]");
    }

    #[test]
    fn test_nth_child_extreme_coefficients() {
        // i64::MIN survives the argument and series parses; the index and
        // offset arithmetic must not overflow on it.
        assert_eq!(
            xpath("li:nth-child(-9223372036854775808)"),
            "descendant-or-self::*/li[-9223372036854775808]"
        );
        assert_eq!(
            xpath("li:nth-child(2n-9223372036854775808)"),
            "descendant-or-self::li[(position() +9223372036854775808) mod 2 = 0]"
        );
        assert_eq!(
            xpath("li:nth-last-child(9223372036854775807)"),
            "descendant-or-self::*/li[last() - 9223372036854775806]"
        );
    }

    #[test]
    fn test_nth_child_invalid_series() {
        assert_eq!(
            translation_error("li:nth-child(foo)"),
            TranslationError::InvalidSeries {
                text: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_contains() {
        assert_eq!(
            xpath("a:contains('Link Text')"),
            "descendant-or-self::a[contains(css:lower-case(string(.)), 'link text')]"
        );
        // Symbol and integer arguments are matched by their text.
        assert_eq!(
            xpath("a:contains(Link)"),
            "descendant-or-self::a[contains(css:lower-case(string(.)), 'link')]"
        );
        assert_eq!(
            xpath("a:contains(5)"),
            "descendant-or-self::a[contains(css:lower-case(string(.)), '5')]"
        );
    }

    #[test]
    fn test_not() {
        assert_eq!(
            xpath("p:not(.hidden)"),
            "descendant-or-self::p[not(contains(concat(' ', normalize-space(@class), ' '), \
             ' hidden '))]"
        );
        // The nested selector's path narrowing is dropped: only the
        // condition is negated, so a bare element test negates nothing.
        assert_eq!(xpath("p:not(div)"), "descendant-or-self::p");
        assert_eq!(
            translation_error("p:not('x')"),
            TranslationError::InvalidArgument {
                function: "not".to_string()
            }
        );
        assert_eq!(
            translation_error("p:not(3)"),
            TranslationError::InvalidArgument {
                function: "not".to_string()
            }
        );
    }

    #[test]
    fn test_unsupported_vs_unknown() {
        assert_eq!(
            translation_error("a:hover"),
            TranslationError::UnsupportedPseudoClass {
                name: "hover".to_string()
            }
        );
        assert_eq!(
            translation_error("a:bogus"),
            TranslationError::UnknownPseudoClass {
                name: "bogus".to_string()
            }
        );
        assert_eq!(
            translation_error("a:lang(en)"),
            TranslationError::UnsupportedPseudoClass {
                name: "lang".to_string()
            }
        );
        assert_eq!(
            translation_error("a:frobnicate(2)"),
            TranslationError::UnknownPseudoClass {
                name: "frobnicate".to_string()
            }
        );
    }

    #[test]
    fn test_conditions_accumulate_left_to_right() {
        assert_eq!(
            xpath("input[type='radio']:checked"),
            "descendant-or-self::input[@type = 'radio' and ((@selected or @checked) and \
             (name()='input' or name()='option'))]"
        );
    }

    #[test]
    fn test_rewrap_keeps_earlier_conditions_inside() {
        assert_eq!(
            xpath("li.item:first-child"),
            "descendant-or-self::*/li[contains(concat(' ', normalize-space(@class), ' '), \
             ' item ')][position() = 0]"
        );
    }

    #[test]
    fn test_nested_or_is_rejected() {
        let nested = Selector::Combined {
            left: Box::new(Selector::Or {
                alternatives: vec![
                    Selector::Element {
                        namespace: None,
                        name: "a".to_string(),
                    },
                    Selector::Element {
                        namespace: None,
                        name: "b".to_string(),
                    },
                ],
            }),
            combinator: Combinator::Child,
            right: Box::new(Selector::Element {
                namespace: None,
                name: "c".to_string(),
            }),
        };
        assert_eq!(
            nested.to_xpath().unwrap_err(),
            TranslationError::NestedSelectorList
        );
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(
            parse("div").unwrap().to_xpath_with_prefix("").unwrap(),
            "div"
        );
        assert_eq!(
            parse("a, b").unwrap().to_xpath_with_prefix("//").unwrap(),
            "//a | //b"
        );
    }
}
