use tracing::{debug, warn};

use crate::{
    catalog::ColumnCatalog,
    compile::Diagnostic,
    config::JitConfig,
    context::{BuildContext, ScopeIdentifier},
    scanner::{ExpressionScanner, UsedColumn},
    synth::{JittedNode, OperationKind, SourceText, SynthesizedUnit, Transformation, UnitKind},
    JitError,
};

/// Symbol the expression check binds the expression value to.
pub const EXPRESSION_SYMBOL: &str = "res";

pub struct CodeSynthesizer;

impl CodeSynthesizer {
    /// Generate, submit and evaluate the code for a `Define` or `Filter`
    /// given as a string.
    ///
    /// Units are submitted in order: variable declarations (only when the
    /// expression references columns), expression check, dispatch call. The
    /// first failure aborts the call and nothing is returned for the caller
    /// to commit.
    pub fn jit_transformation(
        ctx: &BuildContext,
        request: &Transformation,
        catalog: &ColumnCatalog,
    ) -> Result<JittedNode, JitError> {
        let columns = ExpressionScanner::scan_catalog(request.expression, catalog);
        let scope = ctx.next_scope();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        debug!(
            target: "jitframe",
            %scope,
            operation = %request.operation,
            columns = ?names,
            "synthesizing transformation"
        );

        let mut type_names = Vec::with_capacity(columns.len());
        for column in &columns {
            type_names.push(catalog.require_column_type_name(&column.name)?);
        }

        if !columns.is_empty() {
            let unit = SynthesizedUnit::new(
                UnitKind::Declarations,
                Some(&scope),
                Self::variable_declarations(&scope, &columns, &type_names),
            );
            Self::declare(ctx, &unit).map_err(|diagnostic| {
                JitError::DeclarationCompilationError { code: unit.code.clone(), diagnostic }
            })?;
        }

        let unit = SynthesizedUnit::new(
            UnitKind::ExpressionCheck,
            Some(&scope),
            Self::expression_check(&scope, request.expression),
        );
        Self::declare(ctx, &unit).map_err(|diagnostic| {
            JitError::ExpressionCompilationError { code: unit.code.clone(), diagnostic }
        })?;

        let closure = Self::closure(&columns, &type_names, request.expression);
        let unit = SynthesizedUnit::new(
            UnitKind::Dispatch,
            Some(&scope),
            Self::dispatch_call(ctx.config(), request, &closure, &columns),
        );
        Self::log_unit(ctx, &unit);

        let invocation_error = |diagnostic: Option<Diagnostic>| {
            JitError::InvocationCompilationError {
                operation: request.operation.method_name().to_string(),
                code: unit.code.clone(),
                diagnostic,
            }
        };
        let handle = match ctx.service().evaluate(&unit.code) {
            Ok(handle) if !handle.is_null() => handle,
            Ok(_) => {
                warn!(target: "jitframe", %scope, "dispatch call evaluated to a null handle");
                return Err(invocation_error(None));
            }
            Err(diagnostic) => {
                warn!(target: "jitframe", %scope, code = diagnostic.code, "dispatch call refused");
                return Err(invocation_error(Some(diagnostic)));
            }
        };

        Ok(JittedNode {
            handle: handle.into(),
            scope,
            columns,
            column_type_names: type_names,
        })
    }

    /// One placeholder variable per column inside the scope.
    pub fn variable_declarations(
        scope: &ScopeIdentifier,
        columns: &[UsedColumn],
        type_names: &[String],
    ) -> String {
        let mut code = format!("namespace {scope} {{\n");
        for (column, type_name) in columns.iter().zip(type_names) {
            code.push_str(&format!("{} {};\n", type_name, column.name));
        }
        code.push('}');
        code
    }

    pub fn expression_check(scope: &ScopeIdentifier, expression: &str) -> String {
        format!("namespace {scope}{{ auto {EXPRESSION_SYMBOL} = {expression};}}\n")
    }

    /// Closure taking each column by reference, in column order.
    pub fn closure(columns: &[UsedColumn], type_names: &[String], expression: &str) -> String {
        let params: Vec<String> = columns.iter()
            .zip(type_names)
            .map(|(column, type_name)| format!("{}& {}", type_name, column.name))
            .collect();
        format!("[]({}){{ return {};}}", params.join(", "), expression)
    }

    /// The node-construction call, converted to the common handle type so
    /// differently templated results look the same to the caller.
    pub fn dispatch_call(
        config: &JitConfig,
        request: &Transformation,
        closure: &str,
        columns: &[UsedColumn],
    ) -> String {
        let mut args = Vec::with_capacity(4);
        if request.operation == OperationKind::Define {
            args.push(SourceText::quoted(request.name));
        }
        args.push(closure.to_string());
        args.push(SourceText::name_list(columns.iter().map(|c| c.name.as_str())));
        if request.operation == OperationKind::Filter {
            args.push(SourceText::quoted(request.name));
        }

        format!(
            "{}((({}*){})->{}({}));",
            config.interface_type(request.result_type_name),
            request.interface_type_name,
            request.target,
            request.operation.method_name(),
            args.join(", ")
        )
    }

    fn declare(ctx: &BuildContext, unit: &SynthesizedUnit) -> Result<(), Diagnostic> {
        Self::log_unit(ctx, unit);
        ctx.service().declare(&unit.code).inspect_err(|diagnostic| {
            let code = diagnostic.code;
            warn!(target: "jitframe", kind = %unit.kind, code, "{}", diagnostic.message);
        })
    }

    fn log_unit(ctx: &BuildContext, unit: &SynthesizedUnit) {
        if ctx.config().log_generated_code {
            debug!(target: "jitframe", kind = %unit.kind, scope = ?unit.scope, "{}", unit.code);
        }
    }
}
