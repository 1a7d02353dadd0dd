use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use mw_reflect::Reflect;
use mw_reflect::info::{Discriminant, EnumInfo, VariantInfo};
use serde_json::Number;

use super::{Converter, ReadContext, WriteContext, kind_mismatch, member_key, type_mismatch};
use crate::{ConverterQuery, ConverterRegistry, PropertyMap, SerialError};

// -----------------------------------------------------------------------------
// Routing

/// Marker attribute: the enum is written as its variant key instead of its
/// discriminant.
///
/// Applies when found on the property (`#[model(@StringEnum)]` on a field)
/// or on the enum type itself.
///
/// # Examples
///
/// ```
/// use mw_reflect::derive::Model;
/// use mw_wire::{Serializer, convert::StringEnum};
///
/// #[derive(Model, Debug, PartialEq)]
/// enum Color { Red, #[model(rename = "GREEN")] Green }
///
/// #[derive(Model, Default)]
/// struct Paint {
///     code: Option<Color>,
///     #[model(@StringEnum)]
///     name: Option<Color>,
/// }
///
/// let paint = Paint { code: Some(Color::Green), name: Some(Color::Green) };
/// let mut out = Vec::new();
/// Serializer::new().write(&mut out, &paint).unwrap();
/// assert_eq!(out, br#"{"code":1,"name":"GREEN"}"#);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringEnum;

/// Predicate: the value is an enum marked with [`StringEnum`].
pub fn is_string_enum(query: &ConverterQuery) -> bool {
    query.value.as_enum().is_ok()
        && (query.has_attribute::<StringEnum>()
            || query.value.custom_attributes().contains::<StringEnum>())
}

/// Predicate: the value is an enum with a signed representation.
pub fn is_signed_enum(query: &ConverterQuery) -> bool {
    query
        .value
        .as_enum()
        .is_ok_and(|info| info.repr().is_signed())
}

/// Predicate: the value is an enum with an unsigned representation.
pub fn is_unsigned_enum(query: &ConverterQuery) -> bool {
    query
        .value
        .as_enum()
        .is_ok_and(|info| !info.repr().is_signed())
}

fn enum_info(query: &ConverterQuery) -> Result<&'static EnumInfo, SerialError> {
    query
        .value
        .as_enum()
        .map_err(|err| kind_mismatch(query.value.type_path(), err))
}

/// Finds the variant of a value handed to an enum converter.
fn variant_of(info: &'static EnumInfo, value: &dyn Reflect) -> Result<&'static VariantInfo, SerialError> {
    let type_path = info.type_path();
    if value.ty_id() != info.ty_id() {
        return Err(type_mismatch(type_path, value));
    }
    let index = value
        .reflect_ref()
        .as_enum()
        .map_err(|err| kind_mismatch(type_path, err))?
        .variant_index();
    info.variant_at(index)
        .ok_or_else(|| SerialError::invalid_value(type_path, format!("no variant at index {index}")))
}

/// Builds the variant found on the wire, `Err` carries the unknown wire value.
fn construct(
    cx: &ReadContext<'_>,
    info: &'static EnumInfo,
    found: Result<usize, String>,
) -> Result<Box<dyn Reflect>, SerialError> {
    let index = found.map_err(|wire| {
        cx.malformed(format!("unknown variant {wire} of `{}`", info.type_path()))
    })?;
    info.construct(index).ok_or_else(|| {
        SerialError::invalid_value(info.type_path(), format!("no variant at index {index}"))
    })
}

fn write_discriminant(
    cx: &mut WriteContext<'_>,
    variant: &VariantInfo,
    key: Option<&str>,
) {
    match variant.discriminant() {
        Discriminant::Signed(value) => cx.writer().write_number(key, value),
        Discriminant::Unsigned(value) => cx.writer().write_number(key, value),
    }
}

// -----------------------------------------------------------------------------
// I64EnumConverter

/// Converter of enums with a signed representation, the discriminant as a
/// number on the wire.
pub struct I64EnumConverter {
    info: &'static EnumInfo,
}

impl I64EnumConverter {
    pub fn factory(
        query: &ConverterQuery,
        _registry: &ConverterRegistry,
    ) -> Result<Arc<dyn Converter>, SerialError> {
        Ok(Arc::new(Self {
            info: enum_info(query)?,
        }))
    }
}

impl Converter for I64EnumConverter {
    fn read(
        &self,
        cx: &mut ReadContext<'_>,
        top_level: bool,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        let token = cx.begin(top_level)?;
        let (kind, number) = (token.kind(), token.as_number().and_then(Number::as_i64));
        let Some(number) = number else {
            return Err(cx.malformed(format!(
                "expected a signed discriminant of `{}`, found {kind}",
                self.info.type_path()
            )));
        };
        let found = self
            .info
            .variant_by_discriminant(Discriminant::Signed(number))
            .map(|(index, _)| index)
            .ok_or_else(|| format!("{number}"));
        construct(cx, self.info, found)
    }

    fn write(
        &self,
        cx: &mut WriteContext<'_>,
        value: &dyn Reflect,
        map: Option<&PropertyMap>,
        top_level: bool,
    ) -> Result<(), SerialError> {
        let variant = variant_of(self.info, value)?;
        write_discriminant(cx, variant, member_key(map, top_level));
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// U64EnumConverter

/// Converter of enums with an unsigned representation, the discriminant as
/// a number on the wire.
pub struct U64EnumConverter {
    info: &'static EnumInfo,
}

impl U64EnumConverter {
    pub fn factory(
        query: &ConverterQuery,
        _registry: &ConverterRegistry,
    ) -> Result<Arc<dyn Converter>, SerialError> {
        Ok(Arc::new(Self {
            info: enum_info(query)?,
        }))
    }
}

impl Converter for U64EnumConverter {
    fn read(
        &self,
        cx: &mut ReadContext<'_>,
        top_level: bool,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        let token = cx.begin(top_level)?;
        let (kind, number) = (token.kind(), token.as_number().and_then(Number::as_u64));
        let Some(number) = number else {
            return Err(cx.malformed(format!(
                "expected an unsigned discriminant of `{}`, found {kind}",
                self.info.type_path()
            )));
        };
        let found = self
            .info
            .variant_by_discriminant(Discriminant::Unsigned(number))
            .map(|(index, _)| index)
            .ok_or_else(|| format!("{number}"));
        construct(cx, self.info, found)
    }

    fn write(
        &self,
        cx: &mut WriteContext<'_>,
        value: &dyn Reflect,
        map: Option<&PropertyMap>,
        top_level: bool,
    ) -> Result<(), SerialError> {
        let variant = variant_of(self.info, value)?;
        write_discriminant(cx, variant, member_key(map, top_level));
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// StringEnumConverter

/// Converter of enums written as the variant key, see [`StringEnum`].
pub struct StringEnumConverter {
    info: &'static EnumInfo,
}

impl StringEnumConverter {
    pub fn factory(
        query: &ConverterQuery,
        _registry: &ConverterRegistry,
    ) -> Result<Arc<dyn Converter>, SerialError> {
        Ok(Arc::new(Self {
            info: enum_info(query)?,
        }))
    }
}

impl Converter for StringEnumConverter {
    fn read(
        &self,
        cx: &mut ReadContext<'_>,
        top_level: bool,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        let token = cx.begin(top_level)?;
        let found = match token.as_str() {
            Some(key) => self
                .info
                .variant_by_key(key)
                .map(|(index, _)| index)
                .ok_or_else(|| format!("`{key}`")),
            None => {
                let kind = token.kind();
                return Err(cx.malformed(format!(
                    "expected a variant name of `{}`, found {kind}",
                    self.info.type_path()
                )));
            }
        };
        construct(cx, self.info, found)
    }

    fn write(
        &self,
        cx: &mut WriteContext<'_>,
        value: &dyn Reflect,
        map: Option<&PropertyMap>,
        top_level: bool,
    ) -> Result<(), SerialError> {
        let variant = variant_of(self.info, value)?;
        cx.writer()
            .write_string(member_key(map, top_level), variant.key());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mw_reflect::derive::Model;
    use mw_reflect::info::Typed;

    use super::{I64EnumConverter, StringEnum, StringEnumConverter, U64EnumConverter};
    use crate::{ConverterQuery, ConverterRegistry, Serializer};

    #[derive(Model, Debug, PartialEq)]
    #[repr(i8)]
    enum Temperature {
        Cold = -5,
        Warm = 20,
    }

    #[derive(Model, Debug, PartialEq)]
    #[repr(u16)]
    enum Port {
        Http = 80,
        Https = 443,
    }

    #[derive(Model, Debug, PartialEq)]
    #[model(@StringEnum)]
    enum Mode {
        #[model(rename = "ro")]
        ReadOnly,
        #[model(rename = "rw")]
        ReadWrite,
    }

    #[derive(Model, Default, Debug, PartialEq)]
    struct Settings {
        #[model(@StringEnum)]
        port: Option<Port>,
        ports: Vec<Port>,
    }

    #[test]
    fn routing_by_representation_and_marker() {
        let registry = ConverterRegistry::new();

        let signed = registry.resolve(&ConverterQuery::of::<Temperature>()).unwrap();
        assert!(signed.is::<I64EnumConverter>());

        let unsigned = registry.resolve(&ConverterQuery::of::<Port>()).unwrap();
        assert!(unsigned.is::<U64EnumConverter>());

        let marked = registry.resolve(&ConverterQuery::of::<Mode>()).unwrap();
        assert!(marked.is::<StringEnumConverter>());

        let model = Settings::type_info();
        let field = model.as_struct().unwrap().field("port").unwrap();
        let by_field = registry.resolve(&ConverterQuery::property(model, field)).unwrap();
        let inner = by_field
            .downcast_ref::<crate::convert::NullableConverter>()
            .unwrap()
            .inner_converter();
        assert!(inner.is::<StringEnumConverter>());
    }

    #[test]
    fn signed_round_trip() {
        let serializer = Serializer::new();
        let mut out = Vec::new();
        serializer.write(&mut out, &Temperature::Cold).unwrap();
        assert_eq!(out, b"-5");
        assert_eq!(serializer.read::<Temperature>(b"20").unwrap(), Temperature::Warm);
        assert!(serializer.read::<Temperature>(b"7").unwrap_err().is_malformed());
        assert!(serializer.read::<Temperature>(br#""Cold""#).unwrap_err().is_malformed());
    }

    #[test]
    fn unsigned_round_trip() {
        let serializer = Serializer::new();
        let mut out = Vec::new();
        serializer.write(&mut out, &Port::Https).unwrap();
        assert_eq!(out, b"443");
        assert_eq!(serializer.read::<Port>(b"80").unwrap(), Port::Http);
        assert!(serializer.read::<Port>(b"-80").unwrap_err().is_malformed());
    }

    #[test]
    fn string_round_trip() {
        let serializer = Serializer::new();
        let mut out = Vec::new();
        serializer.write(&mut out, &Mode::ReadWrite).unwrap();
        assert_eq!(out, br#""rw""#);
        assert_eq!(serializer.read::<Mode>(br#""ro""#).unwrap(), Mode::ReadOnly);

        let err = serializer.read::<Mode>(br#""ReadOnly""#).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("`ReadOnly`"));
    }

    #[test]
    fn field_marker_only_affects_its_property() {
        let serializer = Serializer::new();
        let settings = Settings {
            port: Some(Port::Http),
            ports: vec![Port::Https],
        };

        let mut out = Vec::new();
        serializer.write(&mut out, &settings).unwrap();
        assert_eq!(out, br#"{"port":"Http","ports":[443]}"#);
        assert_eq!(serializer.read::<Settings>(&out).unwrap(), settings);
    }
}
