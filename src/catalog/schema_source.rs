use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::JitError;

/// Read access to the column layout of the input.
pub trait SchemaSource: Send + Sync {
    /// Column names in schema order.
    fn column_names(&self) -> Vec<String>;

    /// Static type name for a schema column.
    fn column_type_name(&self, name: &str) -> Option<String>;

    fn has_column(&self, name: &str) -> bool {
        self.column_type_name(name).is_some()
    }
}

/// A schema held in memory as an ordered map of column name -> type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: IndexMap<String, String>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: &str, type_name: &str) -> Self {
        self.columns.insert(name.to_string(), type_name.to_string());
        self
    }

    /// Parse `{"columns": {"name": "type", ...}}`, keeping the column order.
    pub fn from_json_str(text: &str) -> Result<Self, JitError> {
        serde_json::from_str(text)
            .map_err(|e| JitError::Config(format!("cannot parse schema: {e}")))
    }
}

impl SchemaSource for TableSchema {
    fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    fn column_type_name(&self, name: &str) -> Option<String> {
        self.columns.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_schema_keeps_declaration_order() {
        let schema = TableSchema::from_json_str(
            r#"{ "columns": { "pt": "double", "eta": "float", "n": "int" } }"#
        ).unwrap();
        assert_eq!(schema.column_names(), vec!["pt", "eta", "n"]);
        assert_eq!(schema.column_type_name("eta").as_deref(), Some("float"));
        assert!(!schema.has_column("phi"));
    }

    #[test]
    fn malformed_schema_is_reported() {
        assert!(matches!(TableSchema::from_json_str("{ nope"), Err(JitError::Config(_))));
    }
}
