use std::fmt::Display;

/// Value the compilation service hands back for an evaluated call.
///
/// For dispatch calls this is the address of the newly built node. Zero is
/// the service's way of saying the call produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CompiledHandle(pub u64);

impl CompiledHandle {
    pub const NULL: CompiledHandle = CompiledHandle(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl Display for CompiledHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
