use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error, MapAccess, SeqAccess, Visitor};
use serde_json::Number;

use crate::SerialError;
use crate::token::Token;

/// Decodes one JSON document into a token sequence.
///
/// Empty input, trailing characters and invalid JSON are
/// [`SerialError::Malformed`].
pub fn decode(bytes: &[u8]) -> Result<Vec<Token>, SerialError> {
    let mut tokens = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    TokenCollector {
        tokens: &mut tokens,
    }
    .deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(tokens)
}

// -----------------------------------------------------------------------------
// TokenCollector

/// Appends the tokens of one JSON value.
struct TokenCollector<'a> {
    tokens: &'a mut Vec<Token>,
}

impl<'de> DeserializeSeed<'de> for TokenCollector<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for TokenCollector<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_bool<E: Error>(self, v: bool) -> Result<Self::Value, E> {
        self.tokens.push(Token::Bool(v));
        Ok(())
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        self.tokens.push(Token::Number(v.into()));
        Ok(())
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        self.tokens.push(Token::Number(v.into()));
        Ok(())
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        let Some(number) = Number::from_f64(v) else {
            return Err(E::custom(format!("non-finite number `{v}`")));
        };
        self.tokens.push(Token::Number(number));
        Ok(())
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        self.tokens.push(Token::String(String::from(v)));
        Ok(())
    }

    fn visit_string<E: Error>(self, v: String) -> Result<Self::Value, E> {
        self.tokens.push(Token::String(v));
        Ok(())
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        self.tokens.push(Token::Null);
        Ok(())
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        self.visit_unit()
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        self.tokens.push(Token::StartArray);
        while seq
            .next_element_seed(TokenCollector {
                tokens: &mut *self.tokens,
            })?
            .is_some()
        {}
        self.tokens.push(Token::EndArray);
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        self.tokens.push(Token::StartObject);
        while let Some(key) = map.next_key::<String>()? {
            self.tokens.push(Token::PropertyKey(key));
            map.next_value_seed(TokenCollector {
                tokens: &mut *self.tokens,
            })?;
        }
        self.tokens.push(Token::EndObject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::decode;
    use crate::token::Token;

    #[test]
    fn scalars() {
        assert_eq!(decode(b"true").unwrap(), [Token::Bool(true)]);
        assert_eq!(decode(b" null ").unwrap(), [Token::Null]);
        assert_eq!(decode(b"-7").unwrap(), [Token::Number((-7_i64).into())]);
        assert_eq!(
            decode(br#""a\"b""#).unwrap(),
            [Token::String("a\"b".into())]
        );
        assert_eq!(
            decode(b"18446744073709551615").unwrap(),
            [Token::Number(u64::MAX.into())]
        );
    }

    #[test]
    fn nested() {
        let tokens = decode(br#"[{"k":[]},{}]"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::StartArray,
                Token::StartObject,
                Token::PropertyKey("k".into()),
                Token::StartArray,
                Token::EndArray,
                Token::EndObject,
                Token::StartObject,
                Token::EndObject,
                Token::EndArray,
            ]
        );
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(decode(b"").unwrap_err().is_malformed());
        assert!(decode(b"   ").unwrap_err().is_malformed());
        assert!(decode(b"[1,").unwrap_err().is_malformed());
        assert!(decode(b"1 2").unwrap_err().is_malformed());
        assert!(decode(br#"{"a" 1}"#).unwrap_err().is_malformed());
    }
}
