use std::fmt::Display;

use crate::compile::CompiledHandle;

/// Address of a node living on the compilation service side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u64);

impl NodeHandle {
    pub fn address(&self) -> u64 {
        self.0
    }
}

impl From<CompiledHandle> for NodeHandle {
    fn from(handle: CompiledHandle) -> Self {
        NodeHandle(handle.0)
    }
}

/// Formats as the hexadecimal address generated code casts from.
impl Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
