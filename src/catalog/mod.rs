pub mod column_namespace;
pub use column_namespace::*;

pub mod custom_column;
pub use custom_column::*;

pub mod schema_source;
pub use schema_source::*;

pub mod data_source;
pub use data_source::*;

pub mod column_catalog;
pub use column_catalog::*;
