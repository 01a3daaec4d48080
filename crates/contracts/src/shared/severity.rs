use serde::{Deserialize, Serialize};

/// Visual weight of a status badge or toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Success => "badge--success",
            Severity::Info => "badge--info",
            Severity::Warning => "badge--warning",
            Severity::Danger => "badge--danger",
        }
    }

    /// Class for a value without a known severity.
    pub fn class_or_neutral(severity: Option<Severity>) -> &'static str {
        severity.map(|s| s.css_class()).unwrap_or("badge--neutral")
    }
}
