use crate::building::ProjectContext;

/// One of the six DB-SI sections
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Si1,
    Si2,
    Si3,
    Si4,
    Si5,
    Si6,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        SectionId::Si1,
        SectionId::Si2,
        SectionId::Si3,
        SectionId::Si4,
        SectionId::Si5,
        SectionId::Si6,
    ];

    /// Short code, e.g. "SI 3"
    pub fn code(&self) -> &'static str {
        match self {
            SectionId::Si1 => "SI 1",
            SectionId::Si2 => "SI 2",
            SectionId::Si3 => "SI 3",
            SectionId::Si4 => "SI 4",
            SectionId::Si5 => "SI 5",
            SectionId::Si6 => "SI 6",
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            SectionId::Si1 => "Interior fire spread",
            SectionId::Si2 => "Exterior fire spread",
            SectionId::Si3 => "Occupant evacuation",
            SectionId::Si4 => "Fire protection installations",
            SectionId::Si5 => "Fire brigade intervention",
            SectionId::Si6 => "Structural fire resistance",
        }
    }

    /// Report title, e.g. "SI 1 - Interior fire spread"
    pub fn title(&self) -> String {
        format!("{} - {}", self.code(), self.subject())
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A labelled, display-formatted value ("Maximum sector area" -> "2500 m²")
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Calculation {
    pub label: String,
    pub value: String,
}

impl Calculation {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Verdict of a section
///
/// Most sections are pass/fail. SI 4 reports the share of required
/// installations actually present instead.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum ComplianceStatus {
    Pass,
    Fail,
    PartialPercent(f64),
    NotEvaluated,
}

impl ComplianceStatus {
    /// Boolean view used by the report status line
    pub fn is_compliant(&self) -> bool {
        match self {
            ComplianceStatus::Pass => true,
            ComplianceStatus::PartialPercent(percent) => *percent >= 100.0,
            ComplianceStatus::Fail | ComplianceStatus::NotEvaluated => false,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ComplianceStatus::Pass => "COMPLIANT".to_string(),
            ComplianceStatus::Fail => "NON-COMPLIANT".to_string(),
            ComplianceStatus::PartialPercent(percent) => {
                format!("{:.0}% OF REQUIRED SYSTEMS INSTALLED", percent)
            }
            ComplianceStatus::NotEvaluated => "NOT EVALUATED".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionResult {
    pub section_id: SectionId,
    pub title: String,
    pub status: ComplianceStatus,
    pub thresholds: Vec<Calculation>, // Ordered for display
    pub recommendations: Vec<String>,
}

impl SectionResult {
    pub fn compliance(&self) -> bool {
        self.status.is_compliant()
    }
}

/// Everything the document renderer needs, in display order
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReportModel {
    pub project_name: String,
    pub project_context: ProjectContext,
    pub general_data: Vec<Calculation>,
    pub sections: Vec<SectionResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_percent_is_compliant_only_when_complete() {
        assert!(ComplianceStatus::PartialPercent(100.0).is_compliant());
        assert!(!ComplianceStatus::PartialPercent(99.5).is_compliant());
        assert!(!ComplianceStatus::NotEvaluated.is_compliant());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ComplianceStatus::Pass.label(), "COMPLIANT");
        assert_eq!(
            ComplianceStatus::PartialPercent(75.0).label(),
            "75% OF REQUIRED SYSTEMS INSTALLED"
        );
    }

    #[test]
    fn test_section_titles() {
        assert_eq!(SectionId::Si1.title(), "SI 1 - Interior fire spread");
        assert_eq!(SectionId::Si6.code(), "SI 6");
    }

    #[test]
    fn test_status_serializes_tagged() {
        let json = serde_json::to_value(ComplianceStatus::PartialPercent(50.0)).unwrap();
        assert_eq!(json["kind"], "partial_percent");
        assert_eq!(json["percent"], 50.0);
    }
}
