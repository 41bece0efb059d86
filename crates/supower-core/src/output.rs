//! Structured output record
//!
//! One record is printed per invocation, shaped for status-bar custom
//! modules (`text`, `alt`, `tooltip`, `class`, `percentage`).

use crate::CoreError;
use crate::device::DeviceInfo;
use crate::format::{self, FormatError};
use crate::tooltip;
use serde::Serialize;

pub const DEFAULT_TEXT: &str = "{Model}";
pub const DEFAULT_ALT: &str = "{BatteryLevel}";
pub const DEFAULT_CLASS: &str = "{BatteryLevel}";
pub const DEFAULT_PERCENTAGE: &str = "{Percentage:.0f}";

/// User templates for every output field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub text: String,
    pub alt: String,
    /// `None` selects the type-dependent default tooltip
    pub tooltip: Option<String>,
    pub class: String,
    pub percentage: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            alt: DEFAULT_ALT.to_string(),
            tooltip: None,
            class: DEFAULT_CLASS.to_string(),
            percentage: DEFAULT_PERCENTAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputRecord {
    Success {
        text: String,
        alt: String,
        tooltip: String,
        class: String,
        percentage: f64,
    },
    Failure {
        text: String,
        tooltip: String,
    },
}

impl OutputRecord {
    /// Render every field of `templates` against `info`
    pub fn success(templates: &Templates, info: &DeviceInfo) -> Result<Self, FormatError> {
        let tooltip = match &templates.tooltip {
            Some(template) => format::render(template, info)?,
            None => format::render(&tooltip::default_tooltip(info.kind()), info)?,
        };

        Ok(OutputRecord::Success {
            text: format::render(&templates.text, info)?,
            alt: format::render(&templates.alt, info)?,
            tooltip,
            class: format::render(&templates.class, info)?,
            percentage: format::render_percentage(&templates.percentage, info)?,
        })
    }

    /// Describe `error` for the device the user asked about
    pub fn failure(identifier: &str, error: &CoreError) -> Self {
        let name = identifier.rsplit('/').next().unwrap_or(identifier);
        let problem = match error {
            CoreError::DeviceNotFound(_) => "cannot be found",
            CoreError::Format(_) => "cannot be formatted",
            CoreError::Check(_) => "cannot be checked",
            CoreError::Service(_) => "cannot be read",
        };

        OutputRecord::Failure {
            text: format!("{name} {problem}"),
            tooltip: error.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
