use alloc::boxed::Box;

use crate::Reflect;

/// A trait for list-like types with ordered, index addressable items.
///
/// # Examples
///
/// ```
/// use mw_reflect::Reflect;
///
/// let mut value = vec![1_i32];
/// let list = value.reflect_mut().as_list().unwrap();
/// list.push(Box::new(2_i32)).unwrap();
/// assert!(list.push(Box::new("3".to_string())).is_err());
///
/// let items: Vec<_> = list.iter().filter_map(|v| v.downcast_ref::<i32>()).collect();
/// assert_eq!(items, [&1, &2]);
/// ```
pub trait List: Reflect {
    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Returns `true` if the list contains no items.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the item at `index`, if present.
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// Appends an item.
    ///
    /// Returns the value back if it is not of the item type.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

impl dyn List {
    /// Returns an iterator over the items in order.
    #[inline]
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            list: self,
            index: 0,
        }
    }
}

/// An iterator over the items of a [`List`].
pub struct ListIter<'a> {
    list: &'a dyn List,
    index: usize,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a dyn Reflect;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.list.get(self.index)?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.list.len().saturating_sub(self.index);
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for ListIter<'_> {}
