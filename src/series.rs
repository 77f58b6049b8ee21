//! `an+b` series arguments for the `nth-*` pseudo-classes.
//!
//! Selectors Level 3 section 6.6.5.2 defines the argument of `:nth-child()`
//! and friends as `an+b` over integers, with `odd` and `even` as keyword
//! shorthands. [`parse`] reduces every accepted form to its `(a, b)` pair.

/// Parses an `an+b` series argument into its `(a, b)` coefficients.
///
/// Accepted forms:
///
/// - `odd` → `(2, 1)`; `even` → `(2, 0)`,
/// - a bare integer `b` → `(1, b)`,
/// - `an+b` with either part optional: `n` → `(1, 0)`, `3n` → `(3, 0)`,
///   `3n+1` → `(3, 1)`, `-n+6` → `(-1, 6)`, `n-2` → `(1, -2)`.
///
/// The split happens at the first `n`; a lone sign counts as ±1 on either
/// side. Returns `None` when the text fits none of these forms.
///
/// # Examples
///
/// ```
/// assert_eq!(cssoxide::series::parse("odd"), Some((2, 1)));
/// assert_eq!(cssoxide::series::parse("-n+6"), Some((-1, 6)));
/// assert_eq!(cssoxide::series::parse("2"), Some((1, 2)));
/// assert_eq!(cssoxide::series::parse("banana"), None);
/// ```
#[must_use]
pub fn parse(text: &str) -> Option<(i64, i64)> {
    match text {
        "odd" => return Some((2, 1)),
        "even" => return Some((2, 0)),
        _ => {}
    }

    let Some(split) = text.find('n') else {
        // Just a b.
        return text.parse().ok().map(|b| (1, b));
    };

    let (step, offset) = text.split_at(split);
    let offset = &offset[1..]; // drop the 'n' itself

    let a = match step {
        "" | "+" => 1,
        "-" => -1,
        _ => step.parse().ok()?,
    };
    let b = match offset {
        "" => 0,
        "+" => 1,
        "-" => -1,
        _ => offset.parse().ok()?,
    };
    Some((a, b))
}
