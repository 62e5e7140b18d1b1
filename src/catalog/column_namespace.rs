use std::fmt::Display;

/// The three places a column name can come from, listed by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnNamespace {
    /// Columns computed on demand through `define`
    Custom,
    /// Columns described by the input schema
    Schema,
    /// Columns supplied by a data-source adapter
    DataSource,
}

impl ColumnNamespace {
    /// Highest precedence first.
    pub const PRECEDENCE: [ColumnNamespace; 3] = [
        ColumnNamespace::Custom,
        ColumnNamespace::Schema,
        ColumnNamespace::DataSource,
    ];
}

impl Display for ColumnNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnNamespace::Custom => f.write_str("custom"),
            ColumnNamespace::Schema => f.write_str("schema"),
            ColumnNamespace::DataSource => f.write_str("data-source"),
        }
    }
}
