use std::fmt::Display;

/// String-expression transformations a node can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Add a computed column
    Define,
    /// Keep only the entries for which the expression holds
    Filter,
}

impl OperationKind {
    /// Member called on the node interface.
    pub fn method_name(&self) -> &'static str {
        match self {
            OperationKind::Define => "Define",
            OperationKind::Filter => "Filter",
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method_name())
    }
}
