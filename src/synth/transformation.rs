use crate::{context::ScopeIdentifier, graph::NodeHandle, scanner::UsedColumn, synth::OperationKind};

/// One string-expression construction call.
#[derive(Debug, Clone, Copy)]
pub struct Transformation<'a> {
    /// Node the new one is attached to
    pub target: NodeHandle,
    pub operation: OperationKind,
    /// Interface type `target` is reinterpreted as, e.g. `Interface<LoopManager>`
    pub interface_type_name: &'a str,
    /// New column name for `Define`, filter name for `Filter` (may be empty)
    pub name: &'a str,
    pub expression: &'a str,
    /// Type parameter of the handle the call result is converted to
    pub result_type_name: &'a str,
}

/// What a successful synthesis produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JittedNode {
    pub handle: NodeHandle,
    pub scope: ScopeIdentifier,
    /// Referenced columns in closure-parameter order
    pub columns: Vec<UsedColumn>,
    pub column_type_names: Vec<String>,
}
