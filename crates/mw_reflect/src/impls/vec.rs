use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ListInfo, TypeInfo, Typed};
use crate::ops::List;

impl<T: Reflect + Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Vec<T> {
    crate::impl_reflect_cast_fn!(List);
}

impl<T: Reflect + Typed> List for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Vec::push(self, value.take::<T>()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use crate::Reflect;

    #[test]
    fn push_checks_item_type() {
        let mut value = vec![String::from("a")];
        let list = value.reflect_mut().as_list().unwrap();

        assert!(list.push(Box::new(String::from("b"))).is_ok());
        let rejected = list.push(Box::new(1_u8)).unwrap_err();
        assert!(rejected.is::<u8>());
        assert_eq!(list.len(), 2);

        assert_eq!(value, ["a", "b"]);
    }

    #[test]
    fn get_out_of_range() {
        let value = vec![1_u32, 2, 3];
        let list = value.reflect_ref().as_list().unwrap();
        assert_eq!(list.get(2).unwrap().downcast_ref::<u32>(), Some(&3));
        assert!(list.get(3).is_none());
        assert_eq!(list.iter().len(), 3);
    }
}
