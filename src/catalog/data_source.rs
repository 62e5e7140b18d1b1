/// A data-source adapter as seen while booking.
///
/// Only the column metadata matters here; reading values happens during
/// execution, which is not this crate's business.
pub trait DataSource: Send + Sync {
    /// Column names in the order the adapter exposes them.
    fn column_names(&self) -> Vec<String>;

    fn column_type_name(&self, name: &str) -> Option<String>;

    fn has_column(&self, name: &str) -> bool {
        self.column_names().iter().any(|c| c == name)
    }
}
