//! One-token-lookahead cursor over the tokenizer.
//!
//! The parser consumes tokens through [`TokenStream`], which adds three
//! things over the raw [`Tokenizer`] iterator: a single token of lookahead
//! ([`TokenStream::peek`]), an `Ok(None)` end-of-stream sentinel rather than
//! an error, and an ordered history of consumed tokens used to render
//! diagnostics. Like the tokenizer underneath, a stream is single-pass: once
//! partially consumed it cannot be restarted.

use crate::error::SyntaxError;
use crate::lexer::{Token, Tokenizer};

/// A single-pass token cursor with one token of lookahead.
pub struct TokenStream {
    tokenizer: Tokenizer,
    /// The peeked-but-unconsumed upcoming token; the outer `Some(None)`
    /// caches a peeked end of stream.
    peeked: Option<Option<Token>>,
    /// Every token consumed so far, in order.
    used: Vec<Token>,
}

impl TokenStream {
    /// Creates a stream over the given tokenizer.
    #[must_use]
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            peeked: None,
            used: Vec::new(),
        }
    }

    /// Returns the upcoming token without consuming it.
    ///
    /// Idempotent: repeated calls return the same token until
    /// [`TokenStream::advance`] consumes it. End of stream is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates a tokenizer [`SyntaxError`] raised while scanning the
    /// upcoming token.
    pub fn peek(&mut self) -> Result<Option<&Token>, SyntaxError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.tokenizer.next().transpose()?);
        }
        Ok(self.peeked.as_ref().and_then(Option::as_ref))
    }

    /// Consumes and returns the upcoming token.
    ///
    /// End of stream is the `Ok(None)` sentinel, never an error; calling
    /// again after the end keeps returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates a tokenizer [`SyntaxError`] raised while scanning the
    /// upcoming token.
    pub fn advance(&mut self) -> Result<Option<Token>, SyntaxError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.tokenizer.next().transpose()?,
        };
        if let Some(token) = &token {
            self.used.push(token.clone());
        }
        Ok(token)
    }

    /// The ordered history of consumed tokens.
    #[must_use]
    pub fn consumed(&self) -> &[Token] {
        &self.used
    }

    /// The approximate char offset of the upcoming token, or the scan offset
    /// when the stream is at its end.
    #[must_use]
    pub fn position(&self) -> usize {
        match &self.peeked {
            Some(Some(token)) => token.position,
            _ => self.tokenizer.offset(),
        }
    }

    /// Drains and returns whatever tokens remain.
    ///
    /// Used when rendering diagnostics. Tokenizer errors in the remainder
    /// are swallowed: draining only happens while reporting an earlier
    /// error, which must win.
    pub fn drain_remaining(&mut self) -> Vec<Token> {
        let mut remaining = Vec::new();
        if let Some(Some(token)) = self.peeked.take() {
            remaining.push(token);
        }
        for token in self.tokenizer.by_ref() {
            match token {
                Ok(token) => remaining.push(token),
                Err(_) => break,
            }
        }
        remaining
    }
}
