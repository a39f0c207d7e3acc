pub mod aggregate;
pub mod classes;
pub mod engine;
pub mod error;
pub mod extractors;
pub mod fields;
pub mod project;
pub mod sections;
pub mod session;
pub mod tables;

#[cfg(test)]
mod test_support;

pub use aggregate::aggregate;
pub use engine::{evaluate_section, EvaluationOptions, Evaluation, Section};
pub use error::ValidationError;
pub use project::ProjectForm;
pub use sections::SectionInput;
pub use session::ProjectSession;

use shared_types::{ProjectContext, ReportModel, SectionResult};

/// ComplianceEngine entry point
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    options: EvaluationOptions,
}

impl ComplianceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvaluationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Evaluate one section
    pub fn evaluate(
        &self,
        context: &ProjectContext,
        input: &SectionInput,
    ) -> Result<SectionResult, ValidationError> {
        sections::evaluate(context, input, &self.options)
    }

    /// Evaluate every input, keeping the results that validate and the
    /// errors of those that don't
    pub fn evaluate_all(
        &self,
        context: &ProjectContext,
        inputs: &[SectionInput],
    ) -> (Vec<SectionResult>, Vec<ValidationError>) {
        let mut results = Vec::new();
        let mut errors = Vec::new();
        for input in inputs {
            match self.evaluate(context, input) {
                Ok(result) => results.push(result),
                Err(err) => errors.push(err),
            }
        }
        (results, errors)
    }

    /// Evaluate every input and assemble the report from the valid ones
    pub fn report(
        &self,
        context: &ProjectContext,
        inputs: &[SectionInput],
    ) -> (ReportModel, Vec<ValidationError>) {
        let (results, errors) = self.evaluate_all(context, inputs);
        (aggregate(context, results), errors)
    }

    pub fn session(&self, context: ProjectContext) -> ProjectSession {
        ProjectSession::new(context, self.options.clone())
    }
}
