//! Per-project evaluation state

use std::collections::BTreeMap;

use shared_types::{ProjectContext, ReportModel, SectionId, SectionResult};

use crate::aggregate::aggregate;
use crate::engine::EvaluationOptions;
use crate::error::ValidationError;
use crate::project::ProjectForm;
use crate::sections::{self, SectionInput};

/// Validated project data plus the latest result of each section
#[derive(Debug, Clone)]
pub struct ProjectSession {
    context: ProjectContext,
    options: EvaluationOptions,
    results: BTreeMap<SectionId, SectionResult>,
}

impl ProjectSession {
    pub fn new(context: ProjectContext, options: EvaluationOptions) -> Self {
        Self {
            context,
            options,
            results: BTreeMap::new(),
        }
    }

    /// Validate the project form and open a session on it
    pub fn open(form: &ProjectForm, options: EvaluationOptions) -> Result<Self, ValidationError> {
        Ok(Self::new(form.validate()?, options))
    }

    pub fn context(&self) -> &ProjectContext {
        &self.context
    }

    /// Evaluate a section and keep its result
    ///
    /// A rejected input leaves any earlier result for that section in place.
    pub fn evaluate(&mut self, input: &SectionInput) -> Result<&SectionResult, ValidationError> {
        let section = input.section_id();
        match sections::evaluate(&self.context, input, &self.options) {
            Ok(result) => {
                self.results.insert(section, result);
                Ok(&self.results[&section])
            }
            Err(err) => {
                tracing::warn!("{} rejected: {}", section, err);
                Err(err)
            }
        }
    }

    pub fn result(&self, section: SectionId) -> Option<&SectionResult> {
        self.results.get(&section)
    }

    pub fn results(&self) -> impl Iterator<Item = &SectionResult> {
        self.results.values()
    }

    pub fn clear(&mut self, section: SectionId) -> Option<SectionResult> {
        self.results.remove(&section)
    }

    pub fn report(&self) -> ReportModel {
        aggregate(&self.context, self.results.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{InteriorSpreadInput, InterventionInput};
    use crate::test_support::project;
    use shared_types::BuildingUse;

    fn si1(area: &str) -> SectionInput {
        SectionInput::Si1(InteriorSpreadInput {
            compartment_area: area.to_string(),
            material_type: "b".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_new_result_replaces_old_one() {
        let mut session = ProjectSession::new(
            project(BuildingUse::Office, 10.0),
            EvaluationOptions::default(),
        );
        assert!(!session.evaluate(&si1("3000")).unwrap().compliance());
        assert!(session.evaluate(&si1("2000")).unwrap().compliance());
        assert_eq!(session.results().count(), 1);
    }

    #[test]
    fn test_rejected_input_keeps_previous_result() {
        let mut session = ProjectSession::new(
            project(BuildingUse::Office, 10.0),
            EvaluationOptions::default(),
        );
        session.evaluate(&si1("2000")).unwrap();
        assert!(session.evaluate(&si1("")).is_err());
        assert!(session.result(SectionId::Si1).unwrap().compliance());
    }

    #[test]
    fn test_report_contains_evaluated_sections_only() {
        let mut session = ProjectSession::new(
            project(BuildingUse::Office, 10.0),
            EvaluationOptions::default(),
        );
        session.evaluate(&si1("2000")).unwrap();
        let _ = session.evaluate(&SectionInput::Si5(InterventionInput::default()));
        let report = session.report();
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].section_id, SectionId::Si1);

        session.clear(SectionId::Si1);
        assert!(session.report().sections.is_empty());
    }

    #[test]
    fn test_open_rejects_invalid_project() {
        let err = ProjectSession::open(&ProjectForm::default(), EvaluationOptions::default())
            .unwrap_err();
        assert_eq!(err.section, None);
    }
}
