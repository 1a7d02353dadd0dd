//! JSON text to [`Token`]s and back.
//!
//! Tokenization is driven by `serde_json`, so the accepted grammar is exactly
//! JSON (RFC 8259), with `serde_json`'s own nesting limit of 128.
//!
//! # Examples
//!
//! ```
//! use mw_wire::{json, token::Token};
//!
//! let tokens = json::decode(br#"{"a":[1,null]}"#).unwrap();
//! assert_eq!(tokens, [
//!     Token::StartObject,
//!     Token::PropertyKey("a".into()),
//!     Token::StartArray,
//!     Token::Number(1.into()),
//!     Token::Null,
//!     Token::EndArray,
//!     Token::EndObject,
//! ]);
//!
//! assert_eq!(json::encode(&tokens).unwrap(), br#"{"a":[1,null]}"#);
//! ```
//!
//! [`Token`]: crate::token::Token

// -----------------------------------------------------------------------------
// Modules

mod decode;
mod encode;

// -----------------------------------------------------------------------------
// Exports

pub use decode::decode;
pub use encode::{encode, encode_into};
