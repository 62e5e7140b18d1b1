use std::any::Any;

use crate::action::TypeTag;

/// Heap slot an action writes its result into once the pipeline runs.
///
/// The slot is allocated before the action is bound so its address can be
/// baked into the generated binding code. The address stays valid for as long
/// as the holder lives, however often the holder itself is moved. Only
/// non-zero-sized values get a unique address; `TypeRegistry::register`
/// enforces that for every constructible result type.
pub struct ResultHolder {
    tag: TypeTag,
    value: Box<dyn Any + Send + Sync>,
}

impl ResultHolder {
    pub fn new(tag: TypeTag, value: Box<dyn Any + Send + Sync>) -> Self {
        Self { tag, value }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn address(&self) -> usize {
        let ptr: *const (dyn Any + Send + Sync) = &*self.value;
        ptr.cast::<()>() as usize
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for ResultHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultHolder")
            .field("tag", &self.tag)
            .field("address", &format_args!("{:#x}", self.address()))
            .finish()
    }
}
