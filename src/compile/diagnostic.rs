use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// What the compilation service reported when it refused a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Service-specific error identifier
    pub code: i32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: i32, message: &str) -> Self {
        Self { code, message: message.to_string() }
    }

    pub fn err<T>(self) -> Result<T, Diagnostic> {
        Err(self)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "Interpreter error code is {}.", self.code)
        } else {
            write!(f, "Interpreter error code is {}: {}", self.code, self.message)
        }
    }
}
