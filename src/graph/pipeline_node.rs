use crate::{
    catalog::CustomColumn,
    context::ScopeIdentifier,
    graph::{NodeHandle, NodeKind},
};

/// What the pipeline remembers about a booked node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineNode {
    pub handle: NodeHandle,
    pub kind: NodeKind,
    pub parent: Option<NodeHandle>,
    /// Base type the node's interface is parameterized with
    pub proxied_type_name: String,
    /// Type the node has on the service side, used when binding actions
    pub concrete_type_name: String,
    /// Filter name or defined column name
    pub name: Option<String>,
    /// Scope of the generated code, for jitted nodes
    pub scope: Option<ScopeIdentifier>,
    /// Custom columns computed upstream of this node, and so usable from it
    pub custom_columns: Vec<CustomColumn>,
}
