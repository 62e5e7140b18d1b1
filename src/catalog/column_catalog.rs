use std::sync::Arc;

use indexmap::IndexMap;

use crate::{catalog::{ColumnNamespace, CustomColumn, DataSource, SchemaSource}, JitError};

/// All the column names a pipeline can see, split by namespace.
///
/// A name may live in more than one namespace; lookups resolve it with the
/// precedence custom > schema > data-source.
#[derive(Clone, Default)]
pub struct ColumnCatalog {
    schema: Option<Arc<dyn SchemaSource>>,
    custom: IndexMap<String, CustomColumn>,
    data_source: Option<Arc<dyn DataSource>>,
}

impl ColumnCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, schema: Arc<dyn SchemaSource>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_data_source(mut self, data_source: Arc<dyn DataSource>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    pub fn data_source(&self) -> Option<&Arc<dyn DataSource>> {
        self.data_source.as_ref()
    }

    /// Register a custom column. Returns `false` and leaves the catalog
    /// untouched if a custom column with that name already exists.
    pub fn add_custom_column(&mut self, column: CustomColumn) -> bool {
        if self.custom.contains_key(&column.name) {
            return false;
        }
        self.custom.insert(column.name.clone(), column);
        true
    }

    pub fn custom_column(&self, name: &str) -> Option<&CustomColumn> {
        self.custom.get(name)
    }

    pub fn custom_columns(&self) -> Vec<CustomColumn> {
        self.custom.values().cloned().collect()
    }

    /// The same schema and data source, seen with only `valid_custom` as
    /// custom columns. Used to resolve names on one branch of a pipeline.
    pub fn branch(&self, valid_custom: &[CustomColumn]) -> Self {
        Self {
            schema: self.schema.clone(),
            custom: valid_custom.iter().map(|c| (c.name.clone(), c.clone())).collect(),
            data_source: self.data_source.clone(),
        }
    }

    pub fn schema_names(&self) -> Vec<String> {
        self.schema.as_ref().map(|s| s.column_names()).unwrap_or_default()
    }

    pub fn custom_names(&self) -> Vec<String> {
        self.custom.keys().cloned().collect()
    }

    pub fn data_source_names(&self) -> Vec<String> {
        self.data_source.as_ref().map(|ds| ds.column_names()).unwrap_or_default()
    }

    pub fn names_in(&self, namespace: ColumnNamespace) -> Vec<String> {
        match namespace {
            ColumnNamespace::Custom => self.custom_names(),
            ColumnNamespace::Schema => self.schema_names(),
            ColumnNamespace::DataSource => self.data_source_names(),
        }
    }

    pub fn is_in(&self, name: &str, namespace: ColumnNamespace) -> bool {
        match namespace {
            ColumnNamespace::Custom => self.custom.contains_key(name),
            ColumnNamespace::Schema => self.schema.as_ref().is_some_and(|s| s.has_column(name)),
            ColumnNamespace::DataSource => {
                self.data_source.as_ref().is_some_and(|ds| ds.has_column(name))
            }
        }
    }

    /// Highest-precedence namespace holding `name`.
    pub fn namespace_of(&self, name: &str) -> Option<ColumnNamespace> {
        ColumnNamespace::PRECEDENCE.into_iter().find(|ns| self.is_in(name, *ns))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.namespace_of(name).is_some()
    }

    /// Static type name of a column, `None` when no namespace can tell.
    ///
    /// A custom column without a known type shadows same-named schema and
    /// data-source columns, so it resolves to `None` as well.
    pub fn column_type_name(&self, name: &str) -> Option<String> {
        let type_name = match self.namespace_of(name)? {
            ColumnNamespace::Custom => self.custom.get(name).and_then(|c| c.type_name.clone()),
            ColumnNamespace::Schema => self.schema.as_ref().and_then(|s| s.column_type_name(name)),
            ColumnNamespace::DataSource => {
                self.data_source.as_ref().and_then(|ds| ds.column_type_name(name))
            }
        };
        type_name.filter(|t| !t.is_empty())
    }

    pub fn require_column_type_name(&self, name: &str) -> Result<String, JitError> {
        self.column_type_name(name)
            .ok_or_else(|| JitError::UnresolvedColumnType { column: name.to_string() })
    }
}
