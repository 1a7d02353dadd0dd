use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;

use mw_reflect::Reflect;
use mw_reflect::info::{StructInfo, TypeInfo};

use super::{Converter, ReadContext, WriteContext, kind_mismatch, member_key, rejected, type_mismatch};
use crate::token::{Token, TokenKind};
use crate::{ConverterQuery, ConverterRegistry, PropertyMap, SerialError};

/// Converter of struct types, an object of keyed members on the wire.
///
/// Member converters are not resolved up front: each field goes through its
/// [`PropertyMap`], created on first use and cached by the serializer. This
/// keeps recursive models resolvable.
///
/// Reading starts from the type's default value, members missing on the
/// wire keep their default. Members written are all reflected fields, in
/// declaration order.
pub struct ObjectConverter {
    type_info: &'static TypeInfo,
    info: &'static StructInfo,
}

impl ObjectConverter {
    /// Factory for the `Struct` shape.
    pub fn factory(
        query: &ConverterQuery,
        _registry: &ConverterRegistry,
    ) -> Result<Arc<dyn Converter>, SerialError> {
        let info = query
            .value
            .as_struct()
            .map_err(|err| kind_mismatch(query.value.type_path(), err))?;
        Ok(Arc::new(Self {
            type_info: query.value,
            info,
        }))
    }
}

impl Converter for ObjectConverter {
    fn read(
        &self,
        cx: &mut ReadContext<'_>,
        top_level: bool,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        let info = self.info;
        let type_path = info.type_path();
        cx.scope(type_path, |cx| {
            cx.expect_start(top_level, TokenKind::StartObject)?;
            let mut value = info.construct_default();

            loop {
                if !cx.advance() {
                    return Err(cx.malformed("unexpected end of input inside an object"));
                }
                let member = match cx.current_token()? {
                    Token::EndObject => break,
                    Token::PropertyKey(key) => match info.index_of_key(key) {
                        Some(index) => info.field_at(index).map(|field| (index, field)),
                        None if cx.config().reject_unknown_members => {
                            return Err(cx.malformed(format!("unknown member `{key}`")));
                        }
                        None => {
                            log::debug!("skipping unknown member `{key}` of `{type_path}`");
                            None
                        }
                    },
                    other => {
                        return Err(cx.malformed(format!(
                            "expected PropertyKey or EndObject, found {}",
                            other.kind()
                        )));
                    }
                };

                if !cx.advance() {
                    return Err(cx.malformed("missing value of an object member"));
                }
                let Some((index, field)) = member else {
                    cx.skip_value()?;
                    continue;
                };

                let map = cx.property_map(self.type_info, field)?;
                let member = map.converter().read(cx, false)?;
                let slot = value
                    .reflect_mut()
                    .as_struct()
                    .map_err(|err| kind_mismatch(type_path, err))?
                    .field_at_mut(index)
                    .ok_or_else(|| {
                        SerialError::invalid_value(type_path, format!("no field `{}`", field.name()))
                    })?;
                slot.set(member)
                    .map_err(|member| rejected(field.type_info().type_path(), member))?;
            }
            Ok(value)
        })
    }

    fn write(
        &self,
        cx: &mut WriteContext<'_>,
        value: &dyn Reflect,
        map: Option<&PropertyMap>,
        top_level: bool,
    ) -> Result<(), SerialError> {
        let info = self.info;
        let type_path = info.type_path();
        if value.ty_id() != info.ty_id() {
            return Err(type_mismatch(type_path, value));
        }
        let object = value
            .reflect_ref()
            .as_struct()
            .map_err(|err| kind_mismatch(type_path, err))?;

        cx.scope(type_path, |cx| {
            cx.writer().write_object_start(member_key(map, top_level));
            for (index, field) in info.iter().enumerate() {
                let Some(member) = object.field_at(index) else {
                    return Err(SerialError::invalid_value(
                        type_path,
                        format!("no field `{}`", field.name()),
                    ));
                };
                let field_map = cx.property_map(self.type_info, field)?;
                field_map
                    .converter()
                    .write(cx, member, Some(&field_map), false)?;
            }
            cx.writer().write_object_end();
            Ok(())
        })
    }
}
