use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use mw_reflect::Reflect;
use mw_reflect::info::{TypeInfo, Typed};
use mw_utils::TypeIdMap;

use crate::convert::{Converter, ReadContext, WriteContext};
use crate::json;
use crate::token::{Token, TokenReader};
use crate::{ConverterQuery, ConverterRegistry, PropertyMapCache, SerialError, SerializerConfig};

/// Reads and writes model values as JSON.
///
/// A serializer owns a shared [`ConverterRegistry`] plus caches of the
/// converters it resolved: one per root type and one [`PropertyMap`] per
/// model property. It is `Send + Sync`; share one instance between threads
/// instead of creating one per call, the caches fill up once.
///
/// # Examples
///
/// ```
/// use mw_reflect::derive::Model;
/// use mw_wire::Serializer;
///
/// #[derive(Model, Default, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     #[model(rename = "Y")]
///     y: i32,
/// }
///
/// let serializer = Serializer::new();
///
/// let mut out = Vec::new();
/// serializer.write(&mut out, &Point { x: 1, y: -2 }).unwrap();
/// assert_eq!(out, br#"{"x":1,"Y":-2}"#);
///
/// // Missing members keep their default.
/// let point: Point = serializer.read(br#"{"Y":5}"#).unwrap();
/// assert_eq!(point, Point { x: 0, y: 5 });
/// ```
///
/// [`PropertyMap`]: crate::PropertyMap
pub struct Serializer {
    registry: Arc<ConverterRegistry>,
    config: SerializerConfig,
    roots: RwLock<TypeIdMap<Arc<dyn Converter>>>,
    maps: PropertyMapCache,
}

impl Serializer {
    /// Creates a serializer over the default registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ConverterRegistry::new()))
    }

    /// Creates a serializer over the given registry.
    pub fn with_registry(registry: Arc<ConverterRegistry>) -> Self {
        Self {
            registry,
            config: SerializerConfig::default(),
            roots: RwLock::new(TypeIdMap::new()),
            maps: PropertyMapCache::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates a serializer over a scope of this serializer's registry.
    ///
    /// `configure` adds the registrations of the scope, the registry of
    /// `self` is left untouched. The new serializer has the same
    /// configuration and empty caches.
    ///
    /// # Examples
    ///
    /// ```
    /// use mw_wire::{Serializer, convert::ScalarConverter};
    ///
    /// let base = Serializer::new();
    /// let scoped = base.scoped(|registry| {
    ///     registry.add_converter::<u8>(ScalarConverter::<u8>::new());
    /// });
    /// assert_eq!(scoped.read::<u8>(b"7").unwrap(), 7);
    /// assert!(scoped.registry().parent().is_some());
    /// ```
    pub fn scoped(&self, configure: impl FnOnce(&mut ConverterRegistry)) -> Serializer {
        let mut registry = self.registry.create_scope();
        configure(&mut registry);
        Serializer::with_registry(Arc::new(registry)).with_config(self.config)
    }

    #[inline]
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Returns the cache of property maps.
    #[inline]
    pub fn property_maps(&self) -> &PropertyMapCache {
        &self.maps
    }

    /// Returns the converter of a document root of type `info`, resolving it
    /// on first use.
    pub fn converter_for(&self, info: &'static TypeInfo) -> Result<Arc<dyn Converter>, SerialError> {
        let id = info.ty_id();

        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(converter) = roots.get(&id) {
            return Ok(Arc::clone(converter));
        }
        drop(roots);

        let resolved = self.registry.resolve(&ConverterQuery::root(info))?;

        let mut roots = self.roots.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(roots.get_or_insert(id, || resolved)))
    }

    // -------------------------------------------------------------------------
    // Read

    /// Reads a value of type `T` from JSON text.
    pub fn read<T: Reflect + Typed>(&self, bytes: &[u8]) -> Result<T, SerialError> {
        self.read_tokens(json::decode(bytes)?)
    }

    /// Reads a value of type `T` from tokens.
    pub fn read_tokens<T: Reflect + Typed>(&self, tokens: Vec<Token>) -> Result<T, SerialError> {
        let info = T::type_info();
        self.read_dynamic(info, tokens)?.take::<T>().map_err(|value| {
            SerialError::invalid_value(
                info.type_path(),
                format!("converter produced `{}`", value.reflect_type_path()),
            )
        })
    }

    /// Reads a value of the type described by `info` from tokens.
    ///
    /// The tokens must hold exactly one value.
    pub fn read_dynamic(
        &self,
        info: &'static TypeInfo,
        tokens: Vec<Token>,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        let converter = self.converter_for(info)?;
        let mut cx = ReadContext::new(self, TokenReader::new(tokens));
        let value = converter.read(&mut cx, true)?;

        if cx.advance() {
            let found = cx.current_token()?.kind();
            return Err(cx.malformed(format!("unexpected {found} after the root value")));
        }
        Ok(value)
    }

    // -------------------------------------------------------------------------
    // Write

    /// Writes `value` as JSON text, appended to `sink`.
    ///
    /// On error `sink` is left unchanged.
    pub fn write<T: Reflect + ?Sized>(&self, sink: &mut Vec<u8>, value: &T) -> Result<(), SerialError> {
        let tokens = self.write_tokens(value.as_reflect())?;
        let bytes = json::encode(&tokens)?;
        sink.extend_from_slice(&bytes);
        Ok(())
    }

    /// Writes `value` as tokens.
    pub fn write_tokens(&self, value: &dyn Reflect) -> Result<Vec<Token>, SerialError> {
        let converter = self.converter_for(value.reflect_type_info())?;
        let mut cx = WriteContext::new(self);
        converter.write(&mut cx, value, None, true)?;
        Ok(cx.into_tokens())
    }
}

impl Default for Serializer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("property_maps", &self.maps)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use mw_reflect::derive::Model;
    use mw_reflect::impls::NonGenericTypeInfoCell;
    use mw_reflect::info::{OpaqueInfo, TypeInfo, Typed};
    use mw_reflect::{Reflect, impl_reflect_cast_fn};

    use super::Serializer;
    use crate::convert::{
        Converter, ReadContext, ScalarConverter, StringEnum, WireScalar, WriteContext, member_key,
    };
    use crate::token::{Token, TokenWriter};
    use crate::{PropertyMap, SerialError, SerializerConfig, json};

    #[derive(Model, Default, Debug, PartialEq, Clone)]
    struct Message {
        id: i64,
        tags: Vec<String>,
        note: Option<String>,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Envelope {
        #[model(rename = "msg")]
        message: Message,
        history: Vec<Message>,
        #[model(skip)]
        cached: u32,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Holes {
        maybe_list: Option<Vec<i32>>,
        list_of_maybe: Vec<Option<i32>>,
    }

    #[derive(Model, Debug, Clone, Copy, PartialEq)]
    #[repr(u8)]
    enum Level {
        Low = 1,
        High = 200,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Levels {
        plain: Vec<Option<Level>>,
        #[model(@StringEnum)]
        named: Vec<Option<Level>>,
    }

    #[derive(Model, Default, Debug)]
    struct Node {
        children: Vec<Node>,
    }

    #[derive(Model, Default, Debug)]
    struct Reading {
        label: String,
        value: f64,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Celsius(f64);

    impl Typed for Celsius {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
        }
    }

    impl Reflect for Celsius {
        impl_reflect_cast_fn!(Opaque);
    }

    impl WireScalar for Celsius {
        fn from_token(token: &Token) -> Result<Self, String> {
            f64::from_token(token).map(Celsius)
        }

        fn write_token(&self, writer: &mut TokenWriter, key: Option<&str>) -> Result<(), String> {
            self.0.write_token(writer, key)
        }
    }

    fn message() -> Message {
        Message {
            id: 123,
            tags: vec!["a".into(), "b".into()],
            note: None,
        }
    }

    fn to_json<T: Reflect>(serializer: &Serializer, value: &T) -> Vec<u8> {
        let mut out = Vec::new();
        serializer.write(&mut out, value).unwrap();
        out
    }

    #[test]
    fn message_scenario() {
        let serializer = Serializer::new();
        let input = br#"{"id":123,"tags":["a","b"],"note":null}"#;

        let tokens = json::decode(input).unwrap();
        let value: Message = serializer.read_tokens(tokens.clone()).unwrap();
        assert_eq!(value, message());

        assert_eq!(serializer.write_tokens(&value).unwrap(), tokens);
        assert_eq!(to_json(&serializer, &value), input);
        assert_eq!(serializer.property_maps().len(), 3);
    }

    fn round_trip<T>(value: T, text: &str)
    where
        T: Reflect + Typed + PartialEq + core::fmt::Debug,
    {
        let serializer = Serializer::new();
        let out = to_json(&serializer, &value);
        assert_eq!(out, text.as_bytes());
        assert_eq!(serializer.read::<T>(&out).unwrap(), value);
    }

    #[test]
    fn scalar_round_trips() {
        round_trip(i8::MIN, "-128");
        round_trip(i16::MAX, "32767");
        round_trip(-5_i32, "-5");
        round_trip(i64::MIN, "-9223372036854775808");
        round_trip(u8::MAX, "255");
        round_trip(7_u16, "7");
        round_trip(u32::MAX, "4294967295");
        round_trip(u64::MAX, "18446744073709551615");
        round_trip(0.5_f32, "0.5");
        round_trip(-2.25_f64, "-2.25");
        round_trip(true, "true");
        round_trip('q', "\"q\"");
        round_trip(String::from("tab\there"), "\"tab\\there\"");
        round_trip(Vec::<i64>::new(), "[]");
    }

    #[test]
    fn nested_structs_and_attributes() {
        let serializer = Serializer::new();
        let envelope = Envelope {
            message: message(),
            history: vec![Message::default()],
            cached: 42,
        };

        let text = to_json(&serializer, &envelope);
        assert_eq!(
            text,
            br#"{"msg":{"id":123,"tags":["a","b"],"note":null},"history":[{"id":0,"tags":[],"note":null}]}"#
        );

        let back: Envelope = serializer.read(&text).unwrap();
        assert_eq!(back.message, envelope.message);
        assert_eq!(back.history, envelope.history);
        assert_eq!(back.cached, 0);
    }

    #[test]
    fn nullable_and_list_compose() {
        let serializer = Serializer::new();
        let holes = Holes {
            maybe_list: None,
            list_of_maybe: vec![Some(1), None, Some(3)],
        };
        let text = to_json(&serializer, &holes);
        assert_eq!(text, br#"{"maybe_list":null,"list_of_maybe":[1,null,3]}"#);
        assert_eq!(serializer.read::<Holes>(&text).unwrap(), holes);

        let filled: Holes = serializer
            .read(br#"{"maybe_list":[],"list_of_maybe":[]}"#)
            .unwrap();
        assert_eq!(filled.maybe_list, Some(vec![]));

        assert_eq!(serializer.read::<Option<i64>>(b"null").unwrap(), None);
        assert_eq!(serializer.read::<Option<i64>>(b"5").unwrap(), Some(5));
        assert_eq!(
            serializer.read::<Option<Vec<u8>>>(b"[1,2]").unwrap(),
            Some(vec![1, 2])
        );
        assert_eq!(to_json(&serializer, &Some(vec![true])), b"[true]");
        assert_eq!(to_json(&serializer, &Option::<u8>::None), b"null");
    }

    #[test]
    fn list_of_nullable_of_enum() {
        let serializer = Serializer::new();
        let levels = Levels {
            plain: vec![Some(Level::High), None],
            named: vec![None, Some(Level::Low)],
        };

        let text = to_json(&serializer, &levels);
        assert_eq!(text, br#"{"plain":[200,null],"named":[null,"Low"]}"#);
        assert_eq!(serializer.read::<Levels>(&text).unwrap(), levels);

        assert!(
            serializer
                .read::<Levels>(br#"{"plain":["High"],"named":[]}"#)
                .unwrap_err()
                .is_malformed()
        );
        assert!(
            serializer
                .read::<Levels>(br#"{"plain":[],"named":[7]}"#)
                .unwrap_err()
                .is_malformed()
        );
    }

    #[test]
    fn malformed_input_is_rejected() {
        let serializer = Serializer::new();

        // A list fed a scalar.
        let err = serializer.read::<Vec<i64>>(b"5").unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("expected StartArray, found Number"));

        // A truncated array.
        let err = serializer
            .read_tokens::<Vec<i64>>(vec![Token::StartArray, Token::Number(1.into())])
            .unwrap_err();
        assert!(err.is_malformed());

        // Trailing tokens after the root.
        let err = serializer
            .read_tokens::<i64>(vec![Token::Number(1.into()), Token::Number(2.into())])
            .unwrap_err();
        assert!(err.is_malformed());

        // Empty input.
        assert!(serializer.read::<i64>(b"").unwrap_err().is_malformed());
        assert!(serializer.read_tokens::<i64>(vec![]).unwrap_err().is_malformed());

        // Wrong member types and out-of-range numbers.
        assert!(
            serializer
                .read::<Message>(br#"{"id":"1","tags":[],"note":null}"#)
                .unwrap_err()
                .is_malformed()
        );
        assert!(serializer.read::<u8>(b"256").unwrap_err().is_malformed());
        assert!(serializer.read::<Message>(b"[]").unwrap_err().is_malformed());
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    #[test]
    fn malformed_errors_carry_the_type_stack() {
        let serializer = Serializer::new();
        let err = serializer
            .read::<Envelope>(br#"{"history":[{"tags":[1]}]}"#)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("(stack:"));
        assert!(message.contains("Envelope"));
        assert!(message.contains(" -> `alloc::vec::Vec<alloc::string::String>`"));
    }

    #[test]
    fn unknown_members() {
        let input = br#"{"id":1,"extra":{"a":[1,{"b":null}]},"tags":[],"note":"x"}"#;

        let serializer = Serializer::new();
        let value: Message = serializer.read(input).unwrap();
        assert_eq!(value.id, 1);
        assert_eq!(value.note.as_deref(), Some("x"));

        let strict = Serializer::new()
            .with_config(SerializerConfig::new().with_reject_unknown_members(true));
        let err = strict.read::<Message>(input).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("`extra`"));
    }

    #[test]
    fn depth_is_limited() {
        let serializer =
            Serializer::new().with_config(SerializerConfig::new().with_max_depth(4));

        assert!(serializer.read::<Node>(br#"{"children":[{}]}"#).is_ok());
        let err = serializer
            .read::<Node>(br#"{"children":[{"children":[{}]}]}"#)
            .unwrap_err();
        assert!(err.is_malformed());

        let mut deep = Node::default();
        for _ in 0..3 {
            deep = Node {
                children: vec![deep],
            };
        }
        let err = serializer.write_tokens(&deep).unwrap_err();
        assert!(matches!(err, SerialError::InvalidValue { .. }));
    }

    #[test]
    fn failed_writes_leave_the_sink_untouched() {
        let serializer = Serializer::new();
        let mut out = b"prefix".to_vec();
        let reading = Reading {
            label: "t".into(),
            value: f64::NAN,
        };

        let err = serializer.write(&mut out, &reading).unwrap_err();
        assert!(matches!(err, SerialError::InvalidValue { .. }));
        assert_eq!(out, b"prefix");
    }

    struct Unclosed;

    impl Converter for Unclosed {
        fn read(&self, cx: &mut ReadContext<'_>, top_level: bool) -> Result<Box<dyn Reflect>, SerialError> {
            cx.begin(top_level)?;
            Ok(Box::new(0_u16))
        }

        fn write(
            &self,
            cx: &mut WriteContext<'_>,
            _: &dyn Reflect,
            map: Option<&PropertyMap>,
            top_level: bool,
        ) -> Result<(), SerialError> {
            cx.writer().write_array_start(member_key(map, top_level));
            Ok(())
        }
    }

    #[test]
    fn unbalanced_converter_output_is_an_invalid_value() {
        let serializer = Serializer::new().scoped(|registry| {
            registry.add_converter::<u16>(Unclosed);
        });
        let mut out = Vec::new();

        let err = serializer.write(&mut out, &vec![1_u16]).unwrap_err();
        assert!(matches!(err, SerialError::InvalidValue { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn scopes_do_not_leak_into_the_parent() {
        let base = Serializer::new();
        assert!(base.read::<Celsius>(b"21.5").unwrap_err().is_unresolved());

        let scoped = base.scoped(|registry| {
            registry.add_converter::<Celsius>(ScalarConverter::<Celsius>::new());
        });
        assert_eq!(scoped.read::<Celsius>(b"21.5").unwrap(), Celsius(21.5));
        assert_eq!(to_json(&scoped, &vec![Celsius(-1.5)]), b"[-1.5]");

        assert!(base.read::<Celsius>(b"21.5").unwrap_err().is_unresolved());
        assert!(base.write_tokens(&Celsius(0.0)).unwrap_err().is_unresolved());
    }

    #[test]
    fn root_converters_are_cached() {
        let serializer = Serializer::new();
        let first = serializer.converter_for(Message::type_info()).unwrap();
        let second = serializer.converter_for(Message::type_info()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn shared_between_threads() {
        let serializer = Serializer::new();
        let expected = to_json(&Serializer::new(), &message());

        std::thread::scope(|scope| {
            for id in 0..8_i64 {
                let serializer = &serializer;
                let expected = &expected;
                scope.spawn(move || {
                    let mut value: Message = serializer.read(expected).unwrap();
                    assert_eq!(value, message());

                    value.id = id;
                    let text = to_json(serializer, &value);
                    let back: Message = serializer.read(&text).unwrap();
                    assert_eq!(back.id, id);
                });
            }
        });

        assert_eq!(serializer.property_maps().len(), 3);
    }
}
