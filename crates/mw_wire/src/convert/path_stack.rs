use alloc::vec::Vec;
use core::fmt;

/// Type paths of the converters currently reading, outermost first.
#[derive(Default, Clone)]
pub(super) struct TypePathStack {
    stack: Vec<&'static str>,
}

impl TypePathStack {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, type_path: &'static str) {
        self.stack.push(type_path);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }
}

impl fmt::Debug for TypePathStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.stack.iter();

        if let Some(first) = iter.next() {
            writeln!(f, "`{first}`")?;
        }

        for path in iter {
            writeln!(f, " -> `{path}`")?;
        }

        Ok(())
    }
}
