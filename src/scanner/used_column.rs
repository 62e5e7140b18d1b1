use crate::catalog::ColumnNamespace;

/// A column referenced by an expression, with the namespace it was
/// attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedColumn {
    pub name: String,
    pub namespace: ColumnNamespace,
}
