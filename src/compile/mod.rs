pub mod diagnostic;
pub use diagnostic::*;

pub mod compiled_handle;
pub use compiled_handle::*;

pub mod compilation_service;
pub use compilation_service::*;
