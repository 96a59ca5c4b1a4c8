//! Status and severity enums for tracker records.
//!
//! Every enum maps totally onto a wire key, a display label, a style class,
//! and a [`Tone`]. Parsing is lenient about case and separators because the
//! server echoes display values (`"In Progress"`) while accepting keys
//! (`IN_PROGRESS`) on write.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// TONE
// ============================================================================

/// Visual weight of a badge. The theme maps each tone onto a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Neutral,
    Primary,
    Success,
    Warning,
    Danger,
    Muted,
}

/// Lowercase a raw value and replace separators so it can key a style class.
pub fn normalize_class(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

/// Replace separators with spaces for display.
pub fn display_label(raw: &str) -> String {
    raw.trim().replace(&['_', '-'][..], " ")
}

/// Canonical form used for lenient matching: `in progress` -> `IN_PROGRESS`.
fn canonical_key(raw: &str) -> String {
    raw.trim()
        .to_ascii_uppercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Error when a string matches no variant of a tracker enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

// ============================================================================
// PROJECT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
    AtRisk,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 6] = [
        ProjectStatus::NotStarted,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
        ProjectStatus::AtRisk,
        ProjectStatus::Cancelled,
    ];

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "NOT_STARTED",
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::OnHold => "ON_HOLD",
            ProjectStatus::AtRisk => "AT_RISK",
            ProjectStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn label(&self) -> String {
        display_label(self.as_wire_str())
    }

    pub fn style_class(&self) -> String {
        format!("status-{}", normalize_class(self.as_wire_str()))
    }

    pub fn tone(&self) -> Tone {
        match self {
            ProjectStatus::NotStarted => Tone::Neutral,
            ProjectStatus::InProgress => Tone::Primary,
            ProjectStatus::Completed => Tone::Success,
            ProjectStatus::OnHold => Tone::Warning,
            ProjectStatus::AtRisk => Tone::Danger,
            ProjectStatus::Cancelled => Tone::Muted,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ProjectStatus::Completed)
    }

    /// Parse a wire value, grouping anything unrecognised under `NotStarted`.
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_key(s).as_str() {
            "NOT_STARTED" => Ok(ProjectStatus::NotStarted),
            "IN_PROGRESS" => Ok(ProjectStatus::InProgress),
            "COMPLETED" => Ok(ProjectStatus::Completed),
            "ON_HOLD" => Ok(ProjectStatus::OnHold),
            "AT_RISK" => Ok(ProjectStatus::AtRisk),
            "CANCELLED" => Ok(ProjectStatus::Cancelled),
            _ => Err(ParseEnumError {
                kind: "project status",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// MILESTONE STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl MilestoneStatus {
    pub const ALL: [MilestoneStatus; 4] = [
        MilestoneStatus::Pending,
        MilestoneStatus::InProgress,
        MilestoneStatus::Completed,
        MilestoneStatus::Delayed,
    ];

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "PENDING",
            MilestoneStatus::InProgress => "IN_PROGRESS",
            MilestoneStatus::Completed => "COMPLETED",
            MilestoneStatus::Delayed => "DELAYED",
        }
    }

    pub fn label(&self) -> String {
        display_label(self.as_wire_str())
    }

    pub fn style_class(&self) -> String {
        format!("status-{}", normalize_class(self.as_wire_str()))
    }

    pub fn tone(&self) -> Tone {
        match self {
            MilestoneStatus::Completed => Tone::Success,
            MilestoneStatus::InProgress => Tone::Primary,
            MilestoneStatus::Pending | MilestoneStatus::Delayed => Tone::Neutral,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, MilestoneStatus::Completed)
    }
}

impl FromStr for MilestoneStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_key(s).as_str() {
            "PENDING" => Ok(MilestoneStatus::Pending),
            "IN_PROGRESS" => Ok(MilestoneStatus::InProgress),
            "COMPLETED" => Ok(MilestoneStatus::Completed),
            "DELAYED" => Ok(MilestoneStatus::Delayed),
            _ => Err(ParseEnumError {
                kind: "milestone status",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// RISK SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RiskSeverity {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskSeverity {
    pub const ALL: [RiskSeverity; 3] = [RiskSeverity::Low, RiskSeverity::Medium, RiskSeverity::High];

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            RiskSeverity::Low => "LOW",
            RiskSeverity::Medium => "MEDIUM",
            RiskSeverity::High => "HIGH",
        }
    }

    pub fn label(&self) -> String {
        display_label(self.as_wire_str())
    }

    pub fn style_class(&self) -> String {
        format!("risk-{}", normalize_class(self.as_wire_str()))
    }

    pub fn tone(&self) -> Tone {
        match self {
            RiskSeverity::High => Tone::Danger,
            RiskSeverity::Medium => Tone::Warning,
            RiskSeverity::Low => Tone::Success,
        }
    }
}

impl FromStr for RiskSeverity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_key(s).as_str() {
            "LOW" => Ok(RiskSeverity::Low),
            "MEDIUM" => Ok(RiskSeverity::Medium),
            "HIGH" => Ok(RiskSeverity::High),
            _ => Err(ParseEnumError {
                kind: "risk severity",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// RISK STATUS
// ============================================================================

/// The server keeps risk status as free text. Values outside the three known
/// ones are carried verbatim in `Other` so an edit writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RiskStatus {
    #[default]
    Open,
    Mitigated,
    Closed,
    Other(String),
}

impl RiskStatus {
    pub const ALL: [RiskStatus; 3] = [RiskStatus::Open, RiskStatus::Mitigated, RiskStatus::Closed];

    /// Known statuses are written in title case.
    pub fn as_wire_str(&self) -> &str {
        match self {
            RiskStatus::Open => "Open",
            RiskStatus::Mitigated => "Mitigated",
            RiskStatus::Closed => "Closed",
            RiskStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        display_label(self.as_wire_str())
    }

    pub fn style_class(&self) -> String {
        format!("risk-status-{}", normalize_class(self.as_wire_str()))
    }

    pub fn tone(&self) -> Tone {
        match self {
            RiskStatus::Open => Tone::Warning,
            RiskStatus::Mitigated => Tone::Primary,
            RiskStatus::Closed => Tone::Muted,
            RiskStatus::Other(_) => Tone::Neutral,
        }
    }
}

impl FromStr for RiskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical_key(s).as_str() {
            "OPEN" => Ok(RiskStatus::Open),
            "MITIGATED" => Ok(RiskStatus::Mitigated),
            "CLOSED" => Ok(RiskStatus::Closed),
            "" => Err(ParseEnumError {
                kind: "risk status",
                value: s.to_string(),
            }),
            _ => Ok(RiskStatus::Other(s.trim().to_string())),
        }
    }
}

// ============================================================================
// SERDE
// ============================================================================

macro_rules! wire_enum_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_wire_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_wire_str())
            }
        }

        /// Unknown or null values fall back to the default variant.
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(raw
                    .as_deref()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or_default())
            }
        }
    };
}

wire_enum_serde!(ProjectStatus);
wire_enum_serde!(MilestoneStatus);
wire_enum_serde!(RiskSeverity);
wire_enum_serde!(RiskStatus);
