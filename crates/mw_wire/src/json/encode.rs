use alloc::vec::Vec;
use core::fmt;

use crate::SerialError;
use crate::token::Token;

/// Encodes a token sequence as compact JSON text.
///
/// The sequence must form exactly one well-nested value, otherwise
/// [`SerialError::InvalidValue`] is returned.
pub fn encode(tokens: &[Token]) -> Result<Vec<u8>, SerialError> {
    let mut out = Vec::new();
    encode_into(&mut out, tokens)?;
    Ok(out)
}

/// Encodes a token sequence, appending the text to `out`.
///
/// On error `out` may hold a partial document.
pub fn encode_into(out: &mut Vec<u8>, tokens: &[Token]) -> Result<(), SerialError> {
    let mut encoder = Encoder {
        out,
        frames: Vec::new(),
        after_key: false,
        complete: false,
    };
    for token in tokens {
        encoder.token(token)?;
    }
    encoder.finish()
}

// -----------------------------------------------------------------------------
// Encoder

fn broken(reason: impl fmt::Display) -> SerialError {
    SerialError::invalid_value("token stream", alloc::format!("{reason}"))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Array,
    Object,
}

struct Frame {
    kind: FrameKind,
    empty: bool,
}

struct Encoder<'a> {
    out: &'a mut Vec<u8>,
    frames: Vec<Frame>,
    // A `PropertyKey` was written and awaits its value.
    after_key: bool,
    // The root value is closed.
    complete: bool,
}

impl Encoder<'_> {
    fn token(&mut self, token: &Token) -> Result<(), SerialError> {
        match token {
            Token::PropertyKey(key) => {
                let Some(frame) = self.frames.last_mut() else {
                    return Err(broken("property key outside of an object"));
                };
                if frame.kind != FrameKind::Object || self.after_key {
                    return Err(broken(alloc::format!(
                        "unexpected property key `{key}`"
                    )));
                }
                if !core::mem::replace(&mut frame.empty, false) {
                    self.out.push(b',');
                }
                serde_json::to_writer(&mut *self.out, key).map_err(broken)?;
                self.out.push(b':');
                self.after_key = true;
            }
            Token::EndArray => self.close(FrameKind::Array, b']')?,
            Token::EndObject => self.close(FrameKind::Object, b'}')?,
            Token::StartArray => {
                self.before_value()?;
                self.out.push(b'[');
                self.frames.push(Frame {
                    kind: FrameKind::Array,
                    empty: true,
                });
            }
            Token::StartObject => {
                self.before_value()?;
                self.out.push(b'{');
                self.frames.push(Frame {
                    kind: FrameKind::Object,
                    empty: true,
                });
            }
            Token::String(text) => {
                self.before_value()?;
                serde_json::to_writer(&mut *self.out, text).map_err(broken)?;
                self.after_value();
            }
            Token::Number(number) => {
                self.before_value()?;
                serde_json::to_writer(&mut *self.out, number).map_err(broken)?;
                self.after_value();
            }
            Token::Bool(value) => {
                self.before_value()?;
                self.out
                    .extend_from_slice(if *value { b"true" } else { b"false" });
                self.after_value();
            }
            Token::Null => {
                self.before_value()?;
                self.out.extend_from_slice(b"null");
                self.after_value();
            }
        }
        Ok(())
    }

    fn before_value(&mut self) -> Result<(), SerialError> {
        if self.after_key {
            self.after_key = false;
            return Ok(());
        }
        match self.frames.last_mut() {
            None if self.complete => Err(broken("more than one root value")),
            None => Ok(()),
            Some(frame) if frame.kind == FrameKind::Object => {
                Err(broken("object member without a property key"))
            }
            Some(frame) => {
                if !core::mem::replace(&mut frame.empty, false) {
                    self.out.push(b',');
                }
                Ok(())
            }
        }
    }

    fn after_value(&mut self) {
        if self.frames.is_empty() {
            self.complete = true;
        }
    }

    fn close(&mut self, kind: FrameKind, byte: u8) -> Result<(), SerialError> {
        match self.frames.last() {
            Some(frame) if frame.kind == kind && !self.after_key => {
                self.frames.pop();
                self.out.push(byte);
                self.after_value();
                Ok(())
            }
            _ => Err(broken(alloc::format!(
                "unbalanced `{}`",
                byte as char
            ))),
        }
    }

    fn finish(self) -> Result<(), SerialError> {
        if self.complete {
            Ok(())
        } else if self.frames.is_empty() && !self.after_key {
            Err(broken("empty token stream"))
        } else {
            Err(broken("unterminated array or object"))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::encode;
    use crate::SerialError;
    use crate::token::Token;

    fn rejected(tokens: &[Token]) -> bool {
        matches!(encode(tokens), Err(SerialError::InvalidValue { .. }))
    }

    #[test]
    fn escapes_strings() {
        let tokens = vec![
            Token::StartObject,
            Token::PropertyKey("q\"k".into()),
            Token::String("line\nbreak".into()),
            Token::EndObject,
        ];
        assert_eq!(encode(&tokens).unwrap(), br#"{"q\"k":"line\nbreak"}"#);
    }

    #[test]
    fn separators() {
        let tokens = vec![
            Token::StartArray,
            Token::Bool(false),
            Token::StartArray,
            Token::EndArray,
            Token::Number(serde_json::Number::from_f64(2.5).unwrap()),
            Token::EndArray,
        ];
        assert_eq!(encode(&tokens).unwrap(), b"[false,[],2.5]");
    }

    #[test]
    fn rejects_broken_streams() {
        assert!(rejected(&[]));
        assert!(rejected(&[Token::EndArray]));
        assert!(rejected(&[Token::StartArray]));
        assert!(rejected(&[Token::Null, Token::Null]));
        assert!(rejected(&[Token::StartObject, Token::Null, Token::EndObject]));
        assert!(rejected(&[
            Token::StartArray,
            Token::PropertyKey("k".into()),
            Token::EndArray
        ]));
    }
}
