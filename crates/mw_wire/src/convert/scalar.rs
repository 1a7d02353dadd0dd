use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::fmt;
use core::marker::PhantomData;

use mw_reflect::Reflect;
use mw_reflect::info::Typed;
use serde_json::Number;

use super::{Converter, ReadContext, WriteContext, member_key, type_mismatch};
use crate::token::{Token, TokenWriter};
use crate::{PropertyMap, SerialError};

// -----------------------------------------------------------------------------
// WireScalar

/// A type carried by a single scalar token.
///
/// Implemented for the primitive types, custom opaque types can implement it
/// and register a [`ScalarConverter`].
pub trait WireScalar: Reflect + Typed + Sized {
    /// Converts a token, the error is a human readable reason.
    fn from_token(token: &Token) -> Result<Self, String>;

    /// Emits the value as one scalar token.
    fn write_token(&self, writer: &mut TokenWriter, key: Option<&str>) -> Result<(), String>;
}

fn unexpected(token: &Token, expected: &str) -> String {
    format!("expected {expected}, found {}", token.kind())
}

macro_rules! impl_wire_integer {
    ($as_wide:ident: $($ty:ty),* $(,)?) => {$(
        impl WireScalar for $ty {
            fn from_token(token: &Token) -> Result<Self, String> {
                let Some(number) = token.as_number() else {
                    return Err(unexpected(token, "a number"));
                };
                let Some(wide) = number.$as_wide() else {
                    return Err(format!("{number} is out of range"));
                };
                <$ty>::try_from(wide).map_err(|_| format!("{number} is out of range"))
            }

            #[inline]
            fn write_token(&self, writer: &mut TokenWriter, key: Option<&str>) -> Result<(), String> {
                writer.write_number(key, *self);
                Ok(())
            }
        }
    )*};
}

impl_wire_integer!(as_i64: i8, i16, i32, i64);
impl_wire_integer!(as_u64: u8, u16, u32, u64);

impl WireScalar for f64 {
    fn from_token(token: &Token) -> Result<Self, String> {
        token
            .as_number()
            .and_then(Number::as_f64)
            .ok_or_else(|| unexpected(token, "a number"))
    }

    fn write_token(&self, writer: &mut TokenWriter, key: Option<&str>) -> Result<(), String> {
        let number = Number::from_f64(*self).ok_or_else(|| format!("non-finite float `{self}`"))?;
        writer.write_number(key, number);
        Ok(())
    }
}

impl WireScalar for f32 {
    fn from_token(token: &Token) -> Result<Self, String> {
        let wide = f64::from_token(token)?;
        if wide.abs() > f64::from(f32::MAX) {
            return Err(format!("{wide} is out of range"));
        }
        Ok(wide as f32)
    }

    fn write_token(&self, writer: &mut TokenWriter, key: Option<&str>) -> Result<(), String> {
        // Widen the shortest `f32` text, not the binary value, so 0.1 stays 0.1.
        let shortest: f64 = format!("{self}")
            .parse()
            .map_err(|_| format!("cannot represent `{self}`"))?;
        shortest.write_token(writer, key)
    }
}

impl WireScalar for bool {
    fn from_token(token: &Token) -> Result<Self, String> {
        token
            .as_bool()
            .ok_or_else(|| unexpected(token, "a boolean"))
    }

    #[inline]
    fn write_token(&self, writer: &mut TokenWriter, key: Option<&str>) -> Result<(), String> {
        writer.write_bool(key, *self);
        Ok(())
    }
}

impl WireScalar for char {
    fn from_token(token: &Token) -> Result<Self, String> {
        let Some(text) = token.as_str() else {
            return Err(unexpected(token, "a string"));
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!("expected a single character, found {text:?}")),
        }
    }

    #[inline]
    fn write_token(&self, writer: &mut TokenWriter, key: Option<&str>) -> Result<(), String> {
        writer.write_string(key, *self);
        Ok(())
    }
}

impl WireScalar for String {
    fn from_token(token: &Token) -> Result<Self, String> {
        token
            .as_str()
            .map(String::from)
            .ok_or_else(|| unexpected(token, "a string"))
    }

    #[inline]
    fn write_token(&self, writer: &mut TokenWriter, key: Option<&str>) -> Result<(), String> {
        writer.write_string(key, self.as_str());
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ScalarConverter

/// Converter of a [`WireScalar`] type.
pub struct ScalarConverter<T>(PhantomData<fn() -> T>);

impl<T: WireScalar> ScalarConverter<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: WireScalar> Default for ScalarConverter<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ScalarConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScalarConverter<{}>", core::any::type_name::<T>())
    }
}

impl<T: WireScalar> Converter for ScalarConverter<T> {
    fn read(
        &self,
        cx: &mut ReadContext<'_>,
        top_level: bool,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        let result = T::from_token(cx.begin(top_level)?);
        match result {
            Ok(value) => Ok(Box::new(value)),
            Err(reason) => Err(cx.malformed(format!(
                "invalid `{}`: {reason}",
                T::type_info().type_path()
            ))),
        }
    }

    fn write(
        &self,
        cx: &mut WriteContext<'_>,
        value: &dyn Reflect,
        map: Option<&PropertyMap>,
        top_level: bool,
    ) -> Result<(), SerialError> {
        let type_path = T::type_info().type_path();
        let Some(scalar) = value.downcast_ref::<T>() else {
            return Err(type_mismatch(type_path, value));
        };
        scalar
            .write_token(cx.writer(), member_key(map, top_level))
            .map_err(|reason| SerialError::invalid_value(type_path, reason))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::WireScalar;
    use crate::token::{Token, TokenWriter};

    #[test]
    fn integers_check_range() {
        let token = Token::Number(300.into());
        assert_eq!(i16::from_token(&token), Ok(300));
        assert!(u8::from_token(&token).is_err());
        assert!(i8::from_token(&token).is_err());

        let negative = Token::Number((-1_i64).into());
        assert_eq!(i64::from_token(&negative), Ok(-1));
        assert!(u64::from_token(&negative).is_err());

        let fraction = Token::Number(serde_json::Number::from_f64(1.5).unwrap());
        assert!(i32::from_token(&fraction).is_err());
        assert!(i32::from_token(&Token::String("1".into())).is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(f64::from_token(&Token::Number(2.into())), Ok(2.0));
        let huge = Token::Number(serde_json::Number::from_f64(1e300).unwrap());
        assert!(f32::from_token(&huge).is_err());

        let mut writer = TokenWriter::new();
        assert!(f64::NAN.write_token(&mut writer, None).is_err());
        assert!(f32::INFINITY.write_token(&mut writer, None).is_err());
        assert!(writer.tokens().is_empty());
    }

    #[test]
    fn f32_keeps_its_shortest_form() {
        let mut writer = TokenWriter::new();
        0.1_f32.write_token(&mut writer, None).unwrap();
        let written = writer.tokens()[0].as_number().unwrap().as_f64().unwrap();
        assert_eq!(written, 0.1_f64);
        assert_eq!(written as f32, 0.1_f32);

        let text = crate::json::encode(writer.tokens()).unwrap();
        assert_eq!(text, b"0.1");
    }

    #[test]
    fn chars_are_single_character_strings() {
        assert_eq!(char::from_token(&Token::String("é".into())), Ok('é'));
        assert!(char::from_token(&Token::String("ab".into())).is_err());
        assert!(char::from_token(&Token::String(String::new())).is_err());
    }
}
