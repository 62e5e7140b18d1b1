use crate::{catalog::ColumnCatalog, JitError};

pub struct ColumnValidator;

impl ColumnValidator {
    /// Columns a transformation or action will read.
    ///
    /// Falls back to the first `n_columns` defaults when `columns` is empty.
    /// Every selected name must exist in some namespace; otherwise all the
    /// unknown names are reported together and nothing is returned.
    pub fn get_validated_column_names(
        default_columns: &[String],
        n_columns: usize,
        columns: &[String],
        catalog: &ColumnCatalog,
    ) -> Result<Vec<String>, JitError> {
        let selected = Self::select_columns(n_columns, columns, default_columns)?;
        let unknown = Self::find_unknown_columns(&selected, catalog);
        if !unknown.is_empty() {
            return JitError::UnknownColumn { names: unknown }.err();
        }
        Ok(selected)
    }

    /// Explicit names win as given; `n_columns` only sizes the default
    /// fallback.
    pub fn select_columns(
        n_columns: usize,
        columns: &[String],
        default_columns: &[String],
    ) -> Result<Vec<String>, JitError> {
        if !columns.is_empty() {
            return Ok(columns.to_vec());
        }
        if default_columns.len() < n_columns {
            let available = default_columns.len();
            return JitError::NotEnoughDefaultColumns { required: n_columns, available }.err();
        }
        Ok(default_columns[..n_columns].to_vec())
    }

    /// Requested names found in no namespace, in request order.
    pub fn find_unknown_columns(columns: &[String], catalog: &ColumnCatalog) -> Vec<String> {
        columns.iter().filter(|c| !catalog.contains(c)).cloned().collect()
    }

    /// One flag per requested column: true when it is not among `defined`
    /// and so has to be read through the data-source adapter.
    pub fn find_undefined_ds_columns(requested: &[String], defined: &[String]) -> Vec<bool> {
        requested.iter().map(|r| !defined.contains(r)).collect()
    }

    pub fn at_least_one_empty_string(values: &[&str]) -> bool {
        values.iter().any(|v| v.is_empty())
    }
}
