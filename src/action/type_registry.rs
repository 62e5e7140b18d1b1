use std::{any::{Any, TypeId}, collections::HashMap};

use crate::action::{ResultHolder, TypeTag};

pub type Constructor = fn() -> Box<dyn Any + Send + Sync>;

fn construct_default<T: Any + Default + Send + Sync>() -> Box<dyn Any + Send + Sync> {
    Box::new(T::default())
}

/// Display name (as the compilation service spells it) plus, for result
/// types, a way to allocate an empty value.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub display_name: String,
    pub construct: Option<Constructor>,
}

/// Static table from Rust type identity to service-side type name.
///
/// Filled once at startup and then shared read-only.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    by_id: HashMap<TypeId, TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self { by_id: HashMap::new() }
    }

    /// Register a result type. Re-registering replaces the entry.
    ///
    /// Result slots are addressed from generated code, so zero-sized types,
    /// which all share one dangling address, are refused at compile time:
    ///
    /// ```compile_fail
    /// let mut registry = jitframe::TypeRegistry::new();
    /// registry.register::<()>("void");
    /// ```
    pub fn register<T: Any + Default + Send + Sync>(&mut self, display_name: &str) -> &mut Self {
        const { assert!(std::mem::size_of::<T>() != 0, "result types must not be zero-sized") };
        self.by_id.insert(TypeId::of::<T>(), TypeEntry {
            display_name: display_name.to_string(),
            construct: Some(construct_default::<T>),
        });
        self
    }

    /// Register a type that only needs a name, such as an action.
    pub fn register_name<T: Any + ?Sized>(&mut self, display_name: &str) -> &mut Self {
        self.by_id.insert(TypeId::of::<T>(), TypeEntry {
            display_name: display_name.to_string(),
            construct: None,
        });
        self
    }

    pub fn get(&self, tag: TypeTag) -> Option<&TypeEntry> {
        self.by_id.get(&tag.id)
    }

    pub fn display_name(&self, tag: TypeTag) -> Option<&str> {
        self.get(tag).map(|e| e.display_name.as_str())
    }

    /// Allocate a fresh, default-valued holder for a registered result type.
    pub fn construct(&self, tag: TypeTag) -> Option<ResultHolder> {
        let construct = self.get(tag)?.construct?;
        Some(ResultHolder::new(tag, construct()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn default_type_registry() -> Self {
        let mut registry = Self::new();
        registry
            .register::<bool>("bool")
            .register::<i32>("int")
            .register::<i64>("long long")
            .register::<u32>("unsigned int")
            .register::<u64>("unsigned long long")
            .register::<f32>("float")
            .register::<f64>("double")
            .register::<String>("std::string")
            .register::<Vec<f64>>("std::vector<double>")
            .register::<Vec<i32>>("std::vector<int>");
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Histogram;

    #[test]
    fn default_registry_names_primitives() {
        let r = TypeRegistry::default_type_registry();
        assert_eq!(r.display_name(TypeTag::of::<f64>()), Some("double"));
        assert_eq!(r.display_name(TypeTag::of::<String>()), Some("std::string"));
        assert_eq!(r.display_name(TypeTag::of::<Histogram>()), None);
        assert_eq!(r.len(), 10);
    }

    #[test]
    fn construct_builds_default_values() {
        let r = TypeRegistry::default_type_registry();
        let holder = r.construct(TypeTag::of::<u64>()).unwrap();
        assert_eq!(holder.downcast_ref::<u64>(), Some(&0));
        assert_eq!(holder.tag(), TypeTag::of::<u64>());
        assert_ne!(holder.address(), 0);
    }

    #[test]
    fn name_only_entries_cannot_be_constructed() {
        let mut r = TypeRegistry::new();
        r.register_name::<Histogram>("ana::Histogram");
        assert_eq!(r.display_name(TypeTag::of::<Histogram>()), Some("ana::Histogram"));
        assert!(r.construct(TypeTag::of::<Histogram>()).is_none());
    }

    #[test]
    fn holders_of_one_type_get_distinct_slots() {
        let r = TypeRegistry::default_type_registry();
        let a = r.construct(TypeTag::of::<bool>()).unwrap();
        let b = r.construct(TypeTag::of::<bool>()).unwrap();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn re_registering_replaces_the_name() {
        let mut r = TypeRegistry::default_type_registry();
        r.register::<u64>("ULong64_t");
        assert_eq!(r.display_name(TypeTag::of::<u64>()), Some("ULong64_t"));
    }
}
