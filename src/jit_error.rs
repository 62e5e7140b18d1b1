use std::fmt::Display;

use crate::compile::Diagnostic;

/// Which side of an action booking a type lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRole {
    Action,
    Result,
}

impl Display for TypeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRole::Action => f.write_str("action type"),
            TypeRole::Result => f.write_str("result type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JitError {
    /// No namespace could tell the static type of a column.
    UnresolvedColumnType { column: String },
    UnknownActionOrResultType { role: TypeRole, type_name: String },
    /// Every requested name that exists in no namespace, in request order.
    UnknownColumn { names: Vec<String> },
    NotEnoughDefaultColumns { required: usize, available: usize },
    EmptyArgument(String),
    ColumnAlreadyDefined(String),
    UnknownNode(String),
    /// The service handed back the handle of a node the pipeline already has.
    DuplicateNode(String),
    DeclarationCompilationError { code: String, diagnostic: Diagnostic },
    ExpressionCompilationError { code: String, diagnostic: Diagnostic },
    InvocationCompilationError { operation: String, code: String, diagnostic: Option<Diagnostic> },
    ActionCompilationError { code: String, diagnostic: Diagnostic },
    Config(String),
}

impl JitError {
    pub fn err<T>(self) -> Result<T, JitError> {
        Err(self)
    }

    /// Generated source text attached to a compilation failure, if any.
    pub fn generated_code(&self) -> Option<&str> {
        match self {
            JitError::DeclarationCompilationError { code, .. }
            | JitError::ExpressionCompilationError { code, .. }
            | JitError::InvocationCompilationError { code, .. }
            | JitError::ActionCompilationError { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            JitError::DeclarationCompilationError { diagnostic, .. }
            | JitError::ExpressionCompilationError { diagnostic, .. }
            | JitError::ActionCompilationError { diagnostic, .. } => Some(diagnostic),
            JitError::InvocationCompilationError { diagnostic, .. } => diagnostic.as_ref(),
            _ => None,
        }
    }
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

impl Display for JitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JitError::UnresolvedColumnType { column } => write!(
                f,
                "The type of column {column} could not be guessed. Please specify one."
            ),
            JitError::UnknownActionOrResultType { role, type_name } => write!(
                f,
                "An error occurred while inferring the {role} of the operation: \
                 {type_name} is not registered."
            ),
            JitError::UnknownColumn { names } => write!(
                f,
                "Unknown column{}: {}",
                plural(names.len(), "", "s"),
                names.join(",")
            ),
            JitError::NotEnoughDefaultColumns { required, available } => write!(
                f,
                "{required} default column name{} required but only {available} {} defined.",
                plural(*required, " is", "s are"),
                plural(*available, "is", "are")
            ),
            JitError::EmptyArgument(what) => write!(f, "The {what} cannot be empty."),
            JitError::ColumnAlreadyDefined(name) => write!(f, "Redefinition of column \"{name}\"."),
            JitError::UnknownNode(handle) => {
                write!(f, "Node {handle} is not part of this pipeline.")
            }
            JitError::DuplicateNode(handle) => write!(
                f,
                "Node {handle} is already part of this pipeline and cannot be booked again."
            ),
            JitError::DeclarationCompilationError { code, diagnostic } => write!(
                f,
                "Cannot declare these variables:  {code}\n{diagnostic}"
            ),
            JitError::ExpressionCompilationError { code, diagnostic } => write!(
                f,
                "Cannot interpret this expression:  {code}\n{diagnostic}"
            ),
            JitError::InvocationCompilationError { operation, code, diagnostic } => {
                write!(f, "Cannot interpret the invocation to {operation}:  {code}")?;
                if let Some(diagnostic) = diagnostic {
                    write!(f, "\n{diagnostic}")?;
                }
                Ok(())
            }
            JitError::ActionCompilationError { code, diagnostic } => write!(
                f,
                "Cannot book these actions:  {code}\n{diagnostic}"
            ),
            JitError::Config(message) => write!(f, "Invalid configuration: {message}"),
        }
    }
}

impl std::error::Error for JitError {}
