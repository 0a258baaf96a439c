// Alert record and presentation-token types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AlertId = u64;

/// Producer category, shown as the alert subtitle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    System,
    Emergency,
    Location,
    Ai,
    Response,
    Map,
    Geofence,
    Weather,
    Crowd,
    Safety,
}

impl AlertCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Emergency => "emergency",
            Self::Location => "location",
            Self::Ai => "ai",
            Self::Response => "response",
            Self::Map => "map",
            Self::Geofence => "geofence",
            Self::Weather => "weather",
            Self::Crowd => "crowd",
            Self::Safety => "safety",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Danger,
    Success,
    Error,
}

impl Severity {
    /// Icon token for the rendering collaborator. Info and error share the
    /// generic info icon.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Danger => "exclamation-triangle",
            Self::Warning => "exclamation-circle",
            Self::Success => "check-circle",
            Self::Info | Self::Error => "info-circle",
        }
    }

    /// Color token for the rendering collaborator.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Danger => "#ef4444",
            Self::Warning => "#f59e0b",
            Self::Success => "#10b981",
            Self::Info | Self::Error => "#3b82f6",
        }
    }
}

/// A timestamped, severity-tagged notification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub category: AlertCategory,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Alert {
    pub fn view(&self) -> AlertView {
        AlertView {
            id: self.id,
            category: self.category.label(),
            message: self.message.clone(),
            severity: self.severity,
            icon: self.severity.icon(),
            color: self.severity.color(),
            created_at: self.created_at,
            read: self.read,
        }
    }
}

/// Render projection of one alert: the record plus its presentation tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertView {
    pub id: AlertId,
    pub category: &'static str,
    pub message: String,
    pub severity: Severity,
    pub icon: &'static str,
    pub color: &'static str,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_token_table() {
        assert_eq!(Severity::Danger.icon(), "exclamation-triangle");
        assert_eq!(Severity::Danger.color(), "#ef4444");
        assert_eq!(Severity::Warning.color(), "#f59e0b");
        assert_eq!(Severity::Success.icon(), "check-circle");
        // Error has no dedicated token and falls back to the info pair.
        assert_eq!(Severity::Error.icon(), Severity::Info.icon());
        assert_eq!(Severity::Error.color(), Severity::Info.color());
    }

    #[test]
    fn test_category_labels() {
        for category in [
            AlertCategory::System,
            AlertCategory::Emergency,
            AlertCategory::Location,
            AlertCategory::Ai,
            AlertCategory::Response,
            AlertCategory::Map,
        ] {
            assert!(!category.label().is_empty());
        }
    }
}
