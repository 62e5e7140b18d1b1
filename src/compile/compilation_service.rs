use crate::compile::{CompiledHandle, Diagnostic};

/// Runtime facility able to declare symbols and evaluate expressions against
/// an already-loaded type universe.
///
/// One service is shared by every pipeline of the process. Calls are
/// synchronous and may block for as long as the service needs; nothing in
/// this crate imposes a timeout.
pub trait CompilationService: Send + Sync {
    /// Process a declaration unit (namespaces, variables, statements).
    fn declare(&self, code: &str) -> Result<(), Diagnostic>;

    /// Evaluate an expression and return its value as a handle.
    fn evaluate(&self, code: &str) -> Result<CompiledHandle, Diagnostic>;

    /// Static type name of an already declared symbol, e.g. `__jitframe_3::res`.
    fn type_name_of(&self, _symbol: &str) -> Option<String> {
        None
    }
}
