use serde::Serialize;
use shared_types::SectionId;
use thiserror::Error;

/// Rejection of an evaluation request
///
/// Lists every required field that is missing, non-numeric, not strictly
/// positive or not one of the accepted values. No partial result exists
/// when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}: missing or invalid fields: {}", .section.map(|s| s.code()).unwrap_or("Project data"), .fields.join(", "))]
pub struct ValidationError {
    /// Section being evaluated, `None` for the general project data
    pub section: Option<SectionId>,
    pub fields: Vec<String>,
}

impl ValidationError {
    pub fn new(section: Option<SectionId>, fields: Vec<String>) -> Self {
        Self { section, fields }
    }

    /// Check whether a given field was flagged
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lists_fields() {
        let err = ValidationError::new(
            Some(SectionId::Si3),
            vec!["floor_area".to_string(), "exit_width".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "SI 3: missing or invalid fields: floor_area, exit_width"
        );
        assert!(err.contains("exit_width"));
        assert!(!err.contains("travel_distance"));
    }

    #[test]
    fn test_project_message() {
        let err = ValidationError::new(None, vec!["floors".to_string()]);
        assert_eq!(
            err.to_string(),
            "Project data: missing or invalid fields: floors"
        );
    }
}
