use std::{any::{Any, TypeId}, fmt::Display};

/// Identity of a Rust type, carried around with its compiler-given name for
/// error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub id: TypeId,
    pub rust_name: &'static str,
}

impl TypeTag {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self { id: TypeId::of::<T>(), rust_name: std::any::type_name::<T>() }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.rust_name)
    }
}
