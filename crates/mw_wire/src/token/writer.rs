use alloc::string::String;
use alloc::vec::Vec;

use serde_json::Number;

use crate::token::Token;

/// Records emitted tokens.
///
/// Every value-starting method takes an optional key: with `Some(key)` a
/// `PropertyKey` token is emitted first, making the value a named member of
/// the enclosing object.
///
/// # Examples
///
/// ```
/// use mw_wire::token::{Token, TokenWriter};
///
/// let mut writer = TokenWriter::new();
/// writer.write_object_start(None);
/// writer.write_bool(Some("ok"), true);
/// writer.write_object_end();
///
/// assert_eq!(writer.tokens(), [
///     Token::StartObject,
///     Token::PropertyKey("ok".into()),
///     Token::Bool(true),
///     Token::EndObject,
/// ]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenWriter {
    tokens: Vec<Token>,
}

impl TokenWriter {
    /// Creates an empty writer.
    #[inline]
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    #[inline]
    fn write_key(&mut self, key: Option<&str>) {
        if let Some(key) = key {
            self.tokens.push(Token::PropertyKey(String::from(key)));
        }
    }

    pub fn write_array_start(&mut self, key: Option<&str>) {
        self.write_key(key);
        self.tokens.push(Token::StartArray);
    }

    pub fn write_array_end(&mut self) {
        self.tokens.push(Token::EndArray);
    }

    pub fn write_object_start(&mut self, key: Option<&str>) {
        self.write_key(key);
        self.tokens.push(Token::StartObject);
    }

    pub fn write_object_end(&mut self) {
        self.tokens.push(Token::EndObject);
    }

    pub fn write_string(&mut self, key: Option<&str>, value: impl Into<String>) {
        self.write_key(key);
        self.tokens.push(Token::String(value.into()));
    }

    pub fn write_number(&mut self, key: Option<&str>, value: impl Into<Number>) {
        self.write_key(key);
        self.tokens.push(Token::Number(value.into()));
    }

    pub fn write_bool(&mut self, key: Option<&str>, value: bool) {
        self.write_key(key);
        self.tokens.push(Token::Bool(value));
    }

    pub fn write_null(&mut self, key: Option<&str>) {
        self.write_key(key);
        self.tokens.push(Token::Null);
    }

    /// Returns the tokens written so far.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consumes the writer, returning the tokens.
    #[inline]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}
