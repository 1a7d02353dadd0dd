use alloc::string::String;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, TypeInfo, Typed};

macro_rules! impl_reflect_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
            }
        }

        impl Reflect for $ty {
            crate::impl_reflect_cast_fn!(Opaque);
        }
    )*};
}

impl_reflect_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool, char, String);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};

    #[test]
    fn scalars_are_opaque() {
        assert_eq!(i8::type_info().kind(), ReflectKind::Opaque);
        assert_eq!(char::type_info().type_path(), "char");
        assert_eq!(String::type_info().type_path(), "alloc::string::String");
        assert!(f64::type_info().as_opaque().is_ok());
        assert!(u64::type_info().as_struct().is_err());
    }

    #[test]
    fn scalar_reflect_ref_is_opaque() {
        let value = 'x';
        let opaque = value.reflect_ref().as_opaque().unwrap();
        assert_eq!(opaque.downcast_ref::<char>(), Some(&'x'));
    }
}
