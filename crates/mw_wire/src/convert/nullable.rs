use alloc::boxed::Box;
use alloc::sync::Arc;

use mw_reflect::Reflect;
use mw_reflect::info::NullableInfo;

use super::{Converter, ReadContext, WriteContext, kind_mismatch, member_key, rejected, type_mismatch};
use crate::token::TokenKind;
use crate::{ConverterQuery, ConverterRegistry, PropertyMap, SerialError};

/// Converter of nullable types: `null` on the wire is the absent value,
/// anything else is read by the inner converter.
pub struct NullableConverter {
    info: &'static NullableInfo,
    inner: Arc<dyn Converter>,
}

impl NullableConverter {
    #[inline]
    pub fn new(info: &'static NullableInfo, inner: Arc<dyn Converter>) -> Self {
        Self { info, inner }
    }

    /// Factory for the `Nullable` shape, resolves the inner converter through
    /// `registry`.
    pub fn factory(
        query: &ConverterQuery,
        registry: &ConverterRegistry,
    ) -> Result<Arc<dyn Converter>, SerialError> {
        let info = query
            .value
            .as_nullable()
            .map_err(|err| kind_mismatch(query.value.type_path(), err))?;
        let inner = registry.resolve(&query.with_value(info.inner_info()))?;
        Ok(Arc::new(Self::new(info, inner)))
    }

    /// Returns the converter of the present value.
    #[inline]
    pub fn inner_converter(&self) -> &Arc<dyn Converter> {
        &self.inner
    }
}

impl Converter for NullableConverter {
    fn read(
        &self,
        cx: &mut ReadContext<'_>,
        top_level: bool,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        // The cursor is on the first token from here on.
        if cx.begin(top_level)?.kind() == TokenKind::Null {
            return Ok(self.info.none());
        }
        let inner = self.inner.read(cx, false)?;
        self.info
            .some(inner)
            .map_err(|inner| rejected(self.info.type_path(), inner))
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
        let nullable = value
            .reflect_ref()
            .as_nullable()
            .map_err(|err| kind_mismatch(type_path, err))?;

        match nullable.value() {
            None => {
                cx.writer().write_null(member_key(map, top_level));
                Ok(())
            }
            Some(inner) => self.inner.write(cx, inner, map, top_level),
        }
    }
}
