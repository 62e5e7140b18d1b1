use tracing::debug;

use crate::{
    action::{ResultHolder, TypeRegistry, TypeTag},
    catalog::ColumnCatalog,
    config::JitConfig,
    graph::NodeHandle,
    jit_error::TypeRole,
    synth::SourceText,
    JitError,
};

/// Everything needed to attach one action to an existing node.
#[derive(Debug, Clone, Copy)]
pub struct ActionBooking<'a> {
    /// Already validated column names
    pub columns: &'a [String],
    /// Concrete type of the node the action hangs from
    pub prev_node_type_name: &'a str,
    pub prev_node: NodeHandle,
    pub result_type: TypeTag,
    pub action_type: TypeTag,
    pub result: &'a ResultHolder,
    pub n_slots: usize,
}

pub struct ActionBinder;

impl ActionBinder {
    /// Text of a call to the generic bind routine, parameterized by the action
    /// type and by every column type:
    ///
    /// ```text
    /// Routine<Action, T1, T2>(*reinterpret_cast<Prev*>(0x..), {"c1", "c2"},
    ///     nSlots, reinterpret_cast<Result*>(0x..));
    /// ```
    ///
    /// Nothing is submitted here.
    pub fn jit_build_and_book(
        config: &JitConfig,
        types: &TypeRegistry,
        booking: &ActionBooking,
        catalog: &ColumnCatalog,
    ) -> Result<String, JitError> {
        let mut column_type_names = Vec::with_capacity(booking.columns.len());
        for column in booking.columns {
            column_type_names.push(catalog.require_column_type_name(column)?);
        }

        let result_type_name = Self::display_name(types, booking.result_type, TypeRole::Result)?;
        let action_type_name = Self::display_name(types, booking.action_type, TypeRole::Action)?;

        let mut template_args = vec![action_type_name.to_string()];
        template_args.extend(column_type_names);

        let code = format!(
            "{}<{}>(*reinterpret_cast<{}*>({}), {}, {}, reinterpret_cast<{}*>({:#x}));",
            config.bind_action_routine,
            template_args.join(", "),
            booking.prev_node_type_name,
            booking.prev_node,
            SourceText::name_list(booking.columns.iter().map(String::as_str)),
            booking.n_slots,
            result_type_name,
            booking.result.address()
        );
        debug!(
            target: "jitframe",
            action = action_type_name,
            node = %booking.prev_node,
            "action binding synthesized"
        );
        Ok(code)
    }

    fn display_name(types: &TypeRegistry, tag: TypeTag, role: TypeRole) -> Result<&str, JitError> {
        types.display_name(tag).ok_or_else(|| JitError::UnknownActionOrResultType {
            role,
            type_name: tag.rust_name.to_string(),
        })
    }
}
