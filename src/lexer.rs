//! CSS selector tokenizer.
//!
//! This module implements a lexer for CSS Level 3 selector expressions as
//! specified in <https://www.w3.org/TR/selectors-3/#lex>. The tokenizer
//! converts selector text into a sequence of [`Token`]s consumed by the
//! parser through [`crate::stream::TokenStream`].
//!
//! The tokenizer is lazy: [`Tokenizer`] implements
//! `Iterator<Item = Result<Token, SyntaxError>>` and scans one token per
//! call. A partially consumed tokenizer cannot be restarted, and after the
//! first error the iterator fuses and yields nothing further.
//!
//! # Scanning order
//!
//! At each position, after skipping whitespace, the scanner tries in order:
//!
//! 1. the `an+b` shorthand (`2n`, `2n+1`, `-n+6`, ...), emitted as a single
//!    symbol token; a bare `n` is excluded because it may be an element name,
//! 2. two-char operators (`~=` `|=` `^=` `$=` `*=` `::` `!=`),
//! 3. single-char punctuation (`>` `+` `~` `,` `.` `*` `=` `[` `]` `(` `)`
//!    `|` `:` `#`),
//! 4. quoted strings with backslash-escape decoding,
//! 5. bare symbols: the longest run of Unicode alphanumerics, `_`, `-`,
//!    and `\`, escape-decoded.
//!
//! `/* ... */` comments are stripped before scanning, so token positions are
//! char offsets into the comment-stripped text.

use std::fmt;

use crate::error::SyntaxError;

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An identifier-like run: element names, class names, attribute names,
    /// pseudo-class identifiers, integers, and `an+b` shorthands.
    Symbol,
    /// A quoted string literal; the token text holds the decoded contents
    /// without the quotes.
    String,
    /// An operator or structural character, one or two chars long.
    Punctuation,
}

/// A single token scanned from selector text.
///
/// Tokens are immutable: produced once by the tokenizer, consumed by the
/// parser, and surfacing afterwards only in error diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The lexical class of this token.
    pub kind: TokenKind,
    /// The token text. Strings and symbols are escape-decoded.
    pub text: String,
    /// 0-based char offset of the token in the comment-stripped input.
    pub position: usize,
}

impl Token {
    /// Returns `true` when this is a punctuation token with the given text.
    #[must_use]
    pub fn is_punctuation(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == text
    }

    /// Returns `true` when this is a symbol token.
    #[must_use]
    pub fn is_symbol(&self) -> bool {
        self.kind == TokenKind::Symbol
    }

    /// Returns `true` when this is a string token.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::String
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "'{}'", self.text),
            TokenKind::Symbol | TokenKind::Punctuation => f.write_str(&self.text),
        }
    }
}

/// Two-char operator tokens, tried before single-char punctuation so that
/// maximal munch resolves `|` vs `|=` and `:` vs `::`.
const TWO_CHAR_OPERATORS: &[&str] = &["~=", "|=", "^=", "$=", "*=", "::", "!="];

/// Single-char punctuation tokens.
const SINGLE_CHAR_PUNCTUATION: &str = ">+~,.*=[]()|:#";

/// CSS selector tokenizer.
///
/// Iterating yields `Result<Token, SyntaxError>`; the end of input yields
/// `None`. Errors cover unterminated strings, invalid escape sequences, and
/// chars that cannot start any token.
///
/// # Examples
///
/// ```
/// use cssoxide::lexer::{Tokenizer, TokenKind};
///
/// let tokens: Result<Vec<_>, _> = Tokenizer::new("div.note").collect();
/// let tokens = tokens.unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[0].kind, TokenKind::Symbol);
/// assert_eq!(tokens[1].text, ".");
/// assert_eq!(tokens[2].text, "note");
/// ```
pub struct Tokenizer {
    /// The comment-stripped input as chars, for Unicode-aware indexing.
    chars: Vec<char>,
    /// Current char offset into the input.
    pos: usize,
    /// Set after the first error; the iterator then yields nothing further.
    failed: bool,
}

impl Tokenizer {
    /// Creates a tokenizer for the given selector text.
    ///
    /// `/* ... */` comments are stripped up front (shortest match, no
    /// nesting). An unterminated `/*` is left in place and later surfaces as
    /// an unexpected-character error.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            chars: strip_comments(input).chars().collect(),
            pos: 0,
            failed: false,
        }
    }

    /// The current scan offset, in chars of the comment-stripped input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Scans the next token. The caller has already skipped whitespace and
    /// checked that input remains.
    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;

        if let Some(end) = self.scan_series() {
            let text = self.text_between(start, end);
            self.pos = end;
            return Ok(Token {
                kind: TokenKind::Symbol,
                text,
                position: start,
            });
        }

        if let Some(op) = self.peek_two_char_operator() {
            self.pos += 2;
            return Ok(Token {
                kind: TokenKind::Punctuation,
                text: op.to_string(),
                position: start,
            });
        }

        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Err(self.error("unexpected end of input")),
        };

        if SINGLE_CHAR_PUNCTUATION.contains(ch) {
            self.advance();
            return Ok(Token {
                kind: TokenKind::Punctuation,
                text: ch.to_string(),
                position: start,
            });
        }

        if ch == '"' || ch == '\'' {
            return self.read_string();
        }

        self.read_symbol()
    }

    /// Returns the end offset of an `an+b` shorthand starting at the current
    /// position, or `None` when the input here is not one.
    ///
    /// The shorthand is `[+-]? digits* 'n' ([+-] digits+)?`. A match that is
    /// exactly the single char `n` is excluded: it stays an ordinary symbol
    /// because it may be an element name.
    fn scan_series(&self) -> Option<usize> {
        let mut i = self.pos;
        if matches!(self.char_at(i), Some('+' | '-')) {
            i += 1;
        }
        while self.char_at(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if self.char_at(i) != Some('n') {
            return None;
        }
        i += 1;
        let bare_n = i - self.pos == 1;

        // Optional signed step suffix; the sign alone is not enough.
        if matches!(self.char_at(i), Some('+' | '-')) {
            let mut j = i + 1;
            while self.char_at(j).is_some_and(|c| c.is_ascii_digit()) {
                j += 1;
            }
            if j > i + 1 {
                return Some(j);
            }
        }

        if bare_n {
            None
        } else {
            Some(i)
        }
    }

    /// Returns the two-char operator at the current position, if any.
    fn peek_two_char_operator(&self) -> Option<&'static str> {
        let first = self.char_at(self.pos)?;
        let second = self.char_at(self.pos + 1)?;
        TWO_CHAR_OPERATORS.iter().copied().find(|op| {
            let bytes = op.as_bytes();
            first == char::from(bytes[0]) && second == char::from(bytes[1])
        })
    }

    /// Reads a quoted string literal.
    ///
    /// A backslash escapes any char, including the closing quote. The token
    /// text is the decoded contents without the surrounding quotes.
    fn read_string(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(ch) => ch,
            None => return Err(self.error("unexpected end of input")),
        };
        self.advance(); // consume the opening quote

        let content_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(SyntaxError::new("unterminated string literal", start)),
                Some(ch) if ch == quote => break,
                Some('\\') => {
                    self.advance(); // consume the backslash
                    if self.peek().is_some() {
                        self.advance(); // consume the escaped char
                    }
                }
                Some(_) => self.advance(),
            }
        }

        let raw = self.text_between(content_start, self.pos);
        self.advance(); // consume the closing quote
        let text = decode_escapes(&raw, start)?;
        Ok(Token {
            kind: TokenKind::String,
            text,
            position: start,
        })
    }

    /// Reads a bare symbol: the longest run of symbol chars, escape-decoded.
    fn read_symbol(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        self.advance_while(is_symbol_char);
        if self.pos == start {
            // The current char can start no token at all.
            let ch = self.char_at(start).unwrap_or('\0');
            return Err(SyntaxError::new(
                format!("unexpected character '{ch}'"),
                start,
            ));
        }
        let raw = self.text_between(start, self.pos);
        let text = decode_escapes(&raw, start)?;
        Ok(Token {
            kind: TokenKind::Symbol,
            text,
            position: start,
        })
    }

    // --- Utility methods ---

    /// Returns the char at the current position, or `None` at end.
    fn peek(&self) -> Option<char> {
        self.char_at(self.pos)
    }

    /// Returns the char at the given offset, or `None` if out of bounds.
    fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// Advances the position by one char.
    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advances while the predicate holds for the current char.
    fn advance_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while self.pos < self.chars.len() && pred(self.chars[self.pos]) {
            self.pos += 1;
        }
    }

    /// Skips Unicode whitespace.
    fn skip_whitespace(&mut self) {
        self.advance_while(char::is_whitespace);
    }

    /// Returns the text between two char offsets.
    fn text_between(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    /// Creates an error at the current position.
    fn error(&self, message: &str) -> SyntaxError {
        SyntaxError::new(message, self.pos)
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Token, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_whitespace();
        if self.pos >= self.chars.len() {
            return None;
        }
        let result = self.next_token();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Returns `true` if the char can appear in a bare symbol.
///
/// Symbols are runs of Unicode alphanumerics, `_`, `-`, and `\` (the
/// backslash carries escape sequences that are decoded afterwards).
fn is_symbol_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '\\'
}

/// Removes `/* ... */` comments (shortest match, no nesting).
///
/// An unterminated `/*` is kept verbatim so the scanner reports the stray
/// `/` as an unexpected character.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("*/") {
            Some(end) => rest = &after_open[end + 2..],
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes backslash escapes in a raw string or symbol.
///
/// Supports the common C-style escapes (`\n`, `\t`, `\r`, `\f`, `\v`, `\0`)
/// and code-point escapes (`\xHH`, `\uHHHH`, `\UHHHHHHHH`). Any other
/// escaped char stands for itself, so `\'` and `\\` work as expected.
fn decode_escapes(raw: &str, position: usize) -> Result<String, SyntaxError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            decoded.push(ch);
            continue;
        }
        match chars.next() {
            None => {
                return Err(SyntaxError::new(
                    format!("trailing backslash in '{raw}'"),
                    position,
                ))
            }
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('r') => decoded.push('\r'),
            Some('f') => decoded.push('\u{0c}'),
            Some('v') => decoded.push('\u{0b}'),
            Some('0') => decoded.push('\0'),
            Some('x') => decoded.push(decode_code_point(&mut chars, 2, position)?),
            Some('u') => decoded.push(decode_code_point(&mut chars, 4, position)?),
            Some('U') => decoded.push(decode_code_point(&mut chars, 8, position)?),
            Some(other) => decoded.push(other),
        }
    }
    Ok(decoded)
}

/// Reads exactly `digits` hex digits and converts them to a char.
fn decode_code_point(
    chars: &mut std::str::Chars<'_>,
    digits: u32,
    position: usize,
) -> Result<char, SyntaxError> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| SyntaxError::new("invalid code-point escape", position))?;
        value = value * 16 + digit;
    }
    char::from_u32(value)
        .ok_or_else(|| SyntaxError::new("escape is not a valid code point", position))
}
