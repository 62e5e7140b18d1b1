pub mod jit_error;
pub use jit_error::*;

pub mod config;
pub use config::JitConfig;

pub mod compile;
pub use compile::{CompilationService, CompiledHandle, Diagnostic};

pub mod catalog;
pub use catalog::{
    ColumnCatalog, ColumnNamespace, CustomColumn, DataSource, SchemaSource, TableSchema,
};

pub mod scanner;
pub use scanner::{ExpressionScanner, UsedColumn};

pub mod context;
pub use context::{BuildContext, ScopeCounter, ScopeIdentifier};

pub mod synth;
pub use synth::{CodeSynthesizer, OperationKind, Transformation};

pub mod action;
pub use action::{ActionBinder, ResultHolder, TypeRegistry, TypeTag};

pub mod validator;
pub use validator::ColumnValidator;

pub mod graph;
pub use graph::{NodeHandle, NodeKind, Pipeline};
