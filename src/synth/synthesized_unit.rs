use std::fmt::Display;

use crate::context::ScopeIdentifier;

/// Stage a piece of generated code belongs to, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Declarations,
    ExpressionCheck,
    Dispatch,
    ActionBinding,
}

impl Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKind::Declarations => f.write_str("declarations"),
            UnitKind::ExpressionCheck => f.write_str("expression check"),
            UnitKind::Dispatch => f.write_str("dispatch"),
            UnitKind::ActionBinding => f.write_str("action binding"),
        }
    }
}

/// Generated source text that only lives until it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedUnit {
    pub kind: UnitKind,
    pub scope: Option<ScopeIdentifier>,
    pub code: String,
}

impl SynthesizedUnit {
    pub fn new(kind: UnitKind, scope: Option<&ScopeIdentifier>, code: String) -> Self {
        Self { kind, scope: scope.cloned(), code }
    }
}
