use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_DISCLAIMER: &str = "// Code generated by go125_codegen. DO NOT EDIT.";

/// Settings of the [`Renderer`](crate::driver::Renderer) driver.
///
/// ```toml
/// disclaimer = "// Code generated by mytool. DO NOT EDIT."
/// mark_generated = true
/// skip_ignored = true
/// validate = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Header placed above every rendered file; empty disables it
    pub disclaimer: String,
    /// Attach the generated marker to files lacking it
    pub mark_generated: bool,
    /// Leave out namespaces flagged `is_ignored`
    pub skip_ignored: bool,
    /// Validate the whole storage before rendering anything
    pub validate: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
            mark_generated: true,
            skip_ignored: true,
            validate: true,
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
