pub mod scope_identifier;
pub use scope_identifier::*;

pub mod build_context;
pub use build_context::*;
