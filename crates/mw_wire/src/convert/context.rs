use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Display;

use mw_reflect::info::{NamedField, TypeInfo};

use crate::token::{Token, TokenKind, TokenReader, TokenWriter};
use crate::{ConverterRegistry, PropertyMap, SerialError, Serializer, SerializerConfig};

#[cfg(all(debug_assertions, feature = "debug"))]
use super::path_stack::TypePathStack;

// -----------------------------------------------------------------------------
// ReadContext

/// The state of one read call: the cursor, the serializer and the nesting.
pub struct ReadContext<'a> {
    serializer: &'a Serializer,
    reader: TokenReader,
    depth: usize,
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack: TypePathStack,
}

impl<'a> ReadContext<'a> {
    pub(crate) fn new(serializer: &'a Serializer, reader: TokenReader) -> Self {
        Self {
            serializer,
            reader,
            depth: 0,
            #[cfg(all(debug_assertions, feature = "debug"))]
            stack: TypePathStack::new(),
        }
    }

    #[inline]
    pub fn serializer(&self) -> &'a Serializer {
        self.serializer
    }

    #[inline]
    pub fn registry(&self) -> &'a ConverterRegistry {
        self.serializer.registry()
    }

    #[inline]
    pub fn config(&self) -> &'a SerializerConfig {
        self.serializer.config()
    }

    /// Moves the cursor to the next token, `false` if the stream is exhausted.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.reader.advance()
    }

    /// Returns the kind of the token under the cursor.
    #[inline]
    pub fn kind(&self) -> Option<TokenKind> {
        self.reader.kind()
    }

    /// Returns the token under the cursor.
    #[inline]
    pub fn current(&self) -> Option<&Token> {
        self.reader.current()
    }

    /// Returns the token under the cursor, or a malformed-input error if the
    /// stream is exhausted.
    pub fn current_token(&self) -> Result<&Token, SerialError> {
        self.reader
            .current()
            .ok_or_else(|| self.malformed("unexpected end of input"))
    }

    /// Positions the cursor on the first token of a value.
    ///
    /// At top level the cursor is advanced once first.
    pub fn begin(&mut self, top_level: bool) -> Result<&Token, SerialError> {
        if top_level && !self.reader.advance() {
            return Err(self.malformed("unexpected end of input"));
        }
        self.current_token()
    }

    /// Like [`begin`](Self::begin), and checks the first token is `expected`.
    pub fn expect_start(&mut self, top_level: bool, expected: TokenKind) -> Result<(), SerialError> {
        let found = self.begin(top_level)?.kind();
        if found == expected {
            Ok(())
        } else {
            Err(self.malformed(format!("expected {expected}, found {found}")))
        }
    }

    /// Runs `f` one nesting level deeper.
    ///
    /// Fails with malformed input once the configured maximum depth is
    /// reached. With the `debug` feature `type_path` is recorded for error
    /// messages.
    pub fn scope<R>(
        &mut self,
        type_path: &'static str,
        f: impl FnOnce(&mut Self) -> Result<R, SerialError>,
    ) -> Result<R, SerialError> {
        if self.depth >= self.config().max_depth {
            return Err(self.malformed(format!(
                "nesting exceeds the maximum depth of {} at `{type_path}`",
                self.config().max_depth
            )));
        }

        self.depth += 1;
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.push(type_path);

        let result = f(self);

        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.pop();
        self.depth -= 1;

        result
    }

    /// Creates a malformed-input error.
    ///
    /// With the `debug` feature the message carries the stack of type paths
    /// being read.
    pub fn malformed(&self, msg: impl Display) -> SerialError {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            SerialError::malformed(format!("{msg} (stack:\n{:?})", self.stack))
        }
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        {
            SerialError::malformed(format!("{msg}"))
        }
    }

    /// Consumes the value under the cursor, nested arrays and objects
    /// included, leaving the cursor on its last token.
    pub fn skip_value(&mut self) -> Result<(), SerialError> {
        let mut depth = 0_usize;
        loop {
            match self.current_token()?.kind() {
                TokenKind::StartArray | TokenKind::StartObject => depth += 1,
                kind @ (TokenKind::EndArray | TokenKind::EndObject) => {
                    let Some(outer) = depth.checked_sub(1) else {
                        return Err(self.malformed(format!("expected a value, found {kind}")));
                    };
                    depth = outer;
                }
                TokenKind::PropertyKey if depth == 0 => {
                    return Err(self.malformed("expected a value, found PropertyKey"));
                }
                _ => {}
            }

            if depth == 0 {
                return Ok(());
            }
            if !self.reader.advance() {
                return Err(self.malformed("unexpected end of input"));
            }
        }
    }

    /// Returns the cached [`PropertyMap`] of `field` in `model`.
    pub fn property_map(
        &self,
        model: &'static TypeInfo,
        field: &'static NamedField,
    ) -> Result<Arc<PropertyMap>, SerialError> {
        self.serializer
            .property_maps()
            .get_or_create(self.registry(), model, field)
    }
}

// -----------------------------------------------------------------------------
// WriteContext

/// The state of one write call: the token writer, the serializer and the
/// nesting.
pub struct WriteContext<'a> {
    serializer: &'a Serializer,
    writer: TokenWriter,
    depth: usize,
}

impl<'a> WriteContext<'a> {
    pub(crate) fn new(serializer: &'a Serializer) -> Self {
        Self {
            serializer,
            writer: TokenWriter::new(),
            depth: 0,
        }
    }

    #[inline]
    pub fn serializer(&self) -> &'a Serializer {
        self.serializer
    }

    #[inline]
    pub fn registry(&self) -> &'a ConverterRegistry {
        self.serializer.registry()
    }

    #[inline]
    pub fn config(&self) -> &'a SerializerConfig {
        self.serializer.config()
    }

    /// Returns the token writer.
    #[inline]
    pub fn writer(&mut self) -> &mut TokenWriter {
        &mut self.writer
    }

    /// Runs `f` one nesting level deeper.
    ///
    /// Fails with an invalid-value error once the configured maximum depth
    /// is reached, which stops runaway recursion through cyclic models.
    pub fn scope<R>(
        &mut self,
        type_path: &'static str,
        f: impl FnOnce(&mut Self) -> Result<R, SerialError>,
    ) -> Result<R, SerialError> {
        if self.depth >= self.config().max_depth {
            return Err(SerialError::invalid_value(
                type_path,
                format!(
                    "nesting exceeds the maximum depth of {}",
                    self.config().max_depth
                ),
            ));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Returns the cached [`PropertyMap`] of `field` in `model`.
    pub fn property_map(
        &self,
        model: &'static TypeInfo,
        field: &'static NamedField,
    ) -> Result<Arc<PropertyMap>, SerialError> {
        self.serializer
            .property_maps()
            .get_or_create(self.registry(), model, field)
    }

    pub(crate) fn into_tokens(self) -> Vec<Token> {
        self.writer.into_tokens()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::ReadContext;
    use crate::Serializer;
    use crate::token::{Token, TokenKind, TokenReader};

    fn context(serializer: &Serializer, tokens: Vec<Token>) -> ReadContext<'_> {
        ReadContext::new(serializer, TokenReader::new(tokens))
    }

    #[test]
    fn begin_advances_only_at_top_level() {
        let serializer = Serializer::new();
        let mut cx = context(&serializer, vec![Token::Null, Token::Bool(true)]);

        assert_eq!(cx.begin(true).unwrap(), &Token::Null);
        assert_eq!(cx.begin(false).unwrap(), &Token::Null);
        assert_eq!(cx.begin(true).unwrap(), &Token::Bool(true));
        assert!(cx.begin(true).unwrap_err().is_malformed());
    }

    #[test]
    fn expect_start_reports_found_kind() {
        let serializer = Serializer::new();
        let mut cx = context(&serializer, vec![Token::Number(1.into())]);

        let err = cx.expect_start(true, TokenKind::StartArray).unwrap_err();
        assert!(err.to_string().contains("expected StartArray, found Number"));
    }

    #[test]
    fn skip_value_consumes_nested_values() {
        let serializer = Serializer::new();
        let mut cx = context(
            &serializer,
            vec![
                Token::StartObject,
                Token::PropertyKey("a".into()),
                Token::StartArray,
                Token::Null,
                Token::EndArray,
                Token::EndObject,
                Token::Bool(false),
            ],
        );

        assert!(cx.advance());
        cx.skip_value().unwrap();
        assert_eq!(cx.kind(), Some(TokenKind::EndObject));
        assert!(cx.advance());
        cx.skip_value().unwrap();
        assert_eq!(cx.kind(), Some(TokenKind::Bool));
    }

    #[test]
    fn skip_value_rejects_truncated_and_stray_tokens() {
        let serializer = Serializer::new();
        let mut cx = context(&serializer, vec![Token::StartArray, Token::Null]);
        assert!(cx.advance());
        assert!(cx.skip_value().unwrap_err().is_malformed());

        let mut cx = context(&serializer, vec![Token::EndObject]);
        assert!(cx.advance());
        assert!(cx.skip_value().unwrap_err().is_malformed());
    }

    #[test]
    fn scope_limits_depth() {
        let serializer =
            Serializer::new().with_config(crate::SerializerConfig::new().with_max_depth(2));
        let mut cx = context(&serializer, vec![]);

        let ok = cx.scope("a", |cx| cx.scope("b", |_| Ok(())));
        assert!(ok.is_ok());

        let err = cx
            .scope("a", |cx| cx.scope("b", |cx| cx.scope("c", |_| Ok(()))))
            .unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("`c`"));
    }
}
