use alloc::boxed::Box;
use alloc::sync::Arc;

use mw_reflect::Reflect;
use mw_reflect::info::ListInfo;

use super::{Converter, ReadContext, WriteContext, kind_mismatch, member_key, rejected, type_mismatch};
use crate::token::TokenKind;
use crate::{ConverterQuery, ConverterRegistry, PropertyMap, SerialError};

/// Converter of list types, an array of items on the wire.
///
/// Holds the converter of the item type, resolved when the list converter is
/// created.
pub struct ListConverter {
    info: &'static ListInfo,
    item: Arc<dyn Converter>,
}

impl ListConverter {
    #[inline]
    pub fn new(info: &'static ListInfo, item: Arc<dyn Converter>) -> Self {
        Self { info, item }
    }

    /// Factory for the `List` shape.
    ///
    /// The item converter is resolved through `registry` with the item type,
    /// keeping the declaring type and property of `query`.
    pub fn factory(
        query: &ConverterQuery,
        registry: &ConverterRegistry,
    ) -> Result<Arc<dyn Converter>, SerialError> {
        let info = query
            .value
            .as_list()
            .map_err(|err| kind_mismatch(query.value.type_path(), err))?;
        let item = registry.resolve(&query.with_value(info.item_info()))?;
        Ok(Arc::new(Self::new(info, item)))
    }

    /// Returns the converter of the items.
    #[inline]
    pub fn item_converter(&self) -> &Arc<dyn Converter> {
        &self.item
    }
}

impl Converter for ListConverter {
    fn read(
        &self,
        cx: &mut ReadContext<'_>,
        top_level: bool,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        let type_path = self.info.type_path();
        cx.scope(type_path, |cx| {
            cx.expect_start(top_level, TokenKind::StartArray)?;

            let mut value = self.info.new_empty();
            let list = value
                .reflect_mut()
                .as_list()
                .map_err(|err| kind_mismatch(type_path, err))?;
            loop {
                if !cx.advance() {
                    return Err(cx.malformed("unexpected end of input inside an array"));
                }
                if cx.kind() == Some(TokenKind::EndArray) {
                    break;
                }
                let item = self.item.read(cx, false)?;
                list.push(item).map_err(|item| rejected(type_path, item))?;
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
        let type_path = self.info.type_path();
        if value.ty_id() != self.info.ty_id() {
            return Err(type_mismatch(type_path, value));
        }
        let list = value
            .reflect_ref()
            .as_list()
            .map_err(|err| kind_mismatch(type_path, err))?;

        cx.scope(type_path, |cx| {
            cx.writer().write_array_start(member_key(map, top_level));
            for item in list.iter() {
                self.item.write(cx, item, None, false)?;
            }
            cx.writer().write_array_end();
            Ok(())
        })
    }
}
