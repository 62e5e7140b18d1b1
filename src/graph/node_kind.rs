use crate::config::JitConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    LoopManager,
    Filter,
    Define,
    Range,
}

impl NodeKind {
    /// Base type the node is viewed through once its concrete type is erased.
    pub fn base_type_name<'a>(&self, config: &'a JitConfig) -> &'a str {
        match self {
            NodeKind::LoopManager => config.loop_manager_type.as_str(),
            NodeKind::Filter => config.filter_base_type.as_str(),
            NodeKind::Define => config.custom_column_base_type.as_str(),
            NodeKind::Range => config.range_base_type.as_str(),
        }
    }
}
