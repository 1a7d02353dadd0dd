use alloc::vec::Vec;

use crate::token::{Token, TokenKind};

/// A forward-only cursor over a token sequence.
///
/// A fresh reader is positioned *before* the first token, so the first
/// [`advance`](Self::advance) moves onto it.
///
/// # Examples
///
/// ```
/// use mw_wire::token::{Token, TokenKind, TokenReader};
///
/// let mut reader = TokenReader::new(vec![Token::StartArray, Token::EndArray]);
/// assert_eq!(reader.kind(), None);
///
/// assert!(reader.advance());
/// assert_eq!(reader.kind(), Some(TokenKind::StartArray));
/// assert!(reader.advance());
/// assert!(!reader.advance());
/// assert!(reader.current().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenReader {
    tokens: Vec<Token>,
    // `None` before the first advance.
    position: Option<usize>,
}

impl TokenReader {
    /// Creates a reader positioned before the first token.
    #[inline]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: None,
        }
    }

    /// Moves to the next token.
    ///
    /// Returns `false` once the stream is exhausted, the cursor then has no
    /// current token.
    pub fn advance(&mut self) -> bool {
        let next = self.position.map_or(0, |pos| pos + 1);
        let len = self.tokens.len();
        self.position = Some(next.min(len));
        next < len
    }

    /// Returns the token under the cursor.
    #[inline]
    pub fn current(&self) -> Option<&Token> {
        self.position.and_then(|pos| self.tokens.get(pos))
    }

    /// Returns the kind of the token under the cursor.
    #[inline]
    pub fn kind(&self) -> Option<TokenKind> {
        self.current().map(Token::kind)
    }

    /// Returns the number of tokens after the current one.
    pub fn remaining(&self) -> usize {
        match self.position {
            None => self.tokens.len(),
            Some(pos) => self.tokens.len().saturating_sub(pos + 1),
        }
    }
}

impl From<Vec<Token>> for TokenReader {
    #[inline]
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::TokenReader;
    use crate::token::Token;

    #[test]
    fn exhausted_reader_stays_exhausted() {
        let mut reader = TokenReader::new(vec![Token::Null]);
        assert_eq!(reader.remaining(), 1);
        assert!(reader.advance());
        assert_eq!(reader.remaining(), 0);
        assert!(!reader.advance());
        assert!(!reader.advance());
        assert_eq!(reader.remaining(), 0);
        assert!(reader.current().is_none());
    }

    #[test]
    fn empty_reader() {
        let mut reader = TokenReader::default();
        assert!(!reader.advance());
        assert!(reader.kind().is_none());
    }
}
