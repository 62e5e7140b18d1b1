pub mod column_validator;
pub use column_validator::*;
