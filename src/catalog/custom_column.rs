/// A column computed on demand by a `define` node.
///
/// `type_name` is `None` when the compilation service could not report the
/// static type of the defining expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomColumn {
    pub name: String,
    pub type_name: Option<String>,
}

impl CustomColumn {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self { name: name.to_string(), type_name: Some(type_name.to_string()) }
    }

    pub fn untyped(name: &str) -> Self {
        Self { name: name.to_string(), type_name: None }
    }
}
