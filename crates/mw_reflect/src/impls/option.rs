use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{NullableInfo, TypeInfo, Typed};
use crate::ops::Nullable;

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Nullable(NullableInfo::new::<T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    crate::impl_reflect_cast_fn!(Nullable);
}

impl<T: Reflect + Typed> Nullable for Option<T> {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(Reflect::as_reflect)
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(Reflect::as_reflect_mut)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};

    #[test]
    fn nested_nullable_info() {
        let info = <Option<Vec<i16>>>::type_info().as_nullable().unwrap();
        assert_eq!(info.inner_info().kind(), ReflectKind::List);
        assert!(info.ty().is::<Option<Vec<i16>>>());
    }

    #[test]
    fn value_access() {
        let mut value = Some(vec![1_i16]);
        let nullable = value.reflect_mut().as_nullable().unwrap();
        assert!(!nullable.is_null());

        let inner = nullable.value_mut().unwrap();
        inner.set(Box::new(Vec::<i16>::new())).unwrap();
        assert_eq!(value, Some(Vec::new()));

        let none: Option<u8> = None;
        assert!(none.reflect_ref().as_nullable().unwrap().is_null());
    }
}
