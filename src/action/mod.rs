pub mod type_tag;
pub use type_tag::*;

pub mod result_holder;
pub use result_holder::*;

pub mod type_registry;
pub use type_registry::*;

pub mod action_binder;
pub use action_binder::*;
