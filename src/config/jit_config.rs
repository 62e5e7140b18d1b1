use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::JitError;

/// Spelling of everything the generated code refers to on the service side.
///
/// - `scope_prefix` is prepended to the scope counter to name each generated
///   namespace.
/// - `interface_template` is the generic handle type every node is wrapped in,
///   e.g. `jitframe::Interface<jitframe::FilterBase>`.
/// - `bind_action_routine` is the generic routine that attaches an action to a
///   node.
/// - the `*_type` fields name the base type of each node kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitConfig {
    pub scope_prefix: String,
    pub interface_template: String,
    pub bind_action_routine: String,
    pub loop_manager_type: String,
    pub filter_base_type: String,
    pub custom_column_base_type: String,
    pub range_base_type: String,
    /// Emit every synthesized unit at `debug` level
    pub log_generated_code: bool,
}

impl Default for JitConfig {
    fn default() -> Self {
        Self {
            scope_prefix: "__jitframe_".to_string(),
            interface_template: "jitframe::Interface".to_string(),
            bind_action_routine: "jitframe::CallBuildAndBook".to_string(),
            loop_manager_type: "jitframe::LoopManager".to_string(),
            filter_base_type: "jitframe::FilterBase".to_string(),
            custom_column_base_type: "jitframe::CustomColumnBase".to_string(),
            range_base_type: "jitframe::RangeBase".to_string(),
            log_generated_code: false,
        }
    }
}

impl JitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same defaults, different namespace prefix.
    pub fn with_prefix(scope_prefix: &str) -> Self {
        Self {
            scope_prefix: scope_prefix.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, JitError> {
        let config: JitConfig = serde_json::from_str(text)
            .map_err(|e| JitError::Config(format!("cannot parse configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, JitError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| JitError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// The prefix must be usable as the head of an identifier.
    pub fn validate(&self) -> Result<(), JitError> {
        let mut chars = self.scope_prefix.chars();
        let head_ok = chars.next().is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
        if !head_ok || !chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
            return JitError::Config(format!("invalid scope prefix '{}'", self.scope_prefix)).err();
        }
        if self.interface_template.is_empty() || self.bind_action_routine.is_empty() {
            let message = "interface template and bind routine must be named";
            return JitError::Config(message.into()).err();
        }
        Ok(())
    }

    /// `<interface_template><base>`
    pub fn interface_type(&self, base_type: &str) -> String {
        format!("{}<{}>", self.interface_template, base_type)
    }
}
