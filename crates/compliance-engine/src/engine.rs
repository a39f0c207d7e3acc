//! Generic rule evaluation shared by all six sections
//!
//! Each section implements [`Section`]: it resolves its raw input against the
//! project context and emits typed thresholds plus an ordered list of
//! [`Outcome`]s. [`evaluate_section`] turns that into a [`SectionResult`]:
//!
//! 1. Limits and requirements decide the verdict (conjunction, or coverage
//!    percentage for sections with [`Verdict::CoveragePercent`])
//! 2. Recommendations are the advice of failed outcomes plus advisories, in
//!    emission order
//!
//! Advice is attached per outcome. A failed outcome may carry no advice at
//! all, in which case nothing is recommended unless
//! [`EvaluationOptions::generic_advice`] is enabled.

use serde::{Deserialize, Serialize};
use shared_types::{Calculation, ComplianceStatus, ProjectContext, SectionId, SectionResult};

use crate::error::ValidationError;
use crate::extractors::numeric::format_number;

/// Direction of a numeric limit, stated explicitly per table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Compliant when `actual <= limit`
    AtMost,
    /// Compliant when `actual >= limit`
    AtLeast,
}

impl Bound {
    pub fn admits(self, actual: f64, limit: f64) -> bool {
        match self {
            Bound::AtMost => actual <= limit,
            Bound::AtLeast => actual >= limit,
        }
    }
}

/// Result of one rule inside a section
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Numeric comparison contributing to the verdict
    Limit {
        label: &'static str,
        actual: f64,
        limit: f64,
        bound: Bound,
        advice: Vec<String>,
    },
    /// Boolean condition contributing to the verdict
    Requirement {
        label: String,
        satisfied: bool,
        advice: Vec<String>,
    },
    /// Recommendation that never affects the verdict
    Advisory(String),
}

impl Outcome {
    pub fn limit(label: &'static str, actual: f64, limit: f64, bound: Bound) -> Self {
        Outcome::Limit {
            label,
            actual,
            limit,
            bound,
            advice: Vec::new(),
        }
    }

    pub fn requirement(label: impl Into<String>, satisfied: bool) -> Self {
        Outcome::Requirement {
            label: label.into(),
            satisfied,
            advice: Vec::new(),
        }
    }

    /// Attach advice shown when this outcome fails
    pub fn advise(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Outcome::Limit { advice, .. } | Outcome::Requirement { advice, .. } => {
                advice.push(text.into())
            }
            Outcome::Advisory(_) => {}
        }
        self
    }

    /// Whether this outcome takes part in the verdict
    pub fn is_check(&self) -> bool {
        !matches!(self, Outcome::Advisory(_))
    }

    pub fn passed(&self) -> bool {
        match self {
            Outcome::Limit {
                actual,
                limit,
                bound,
                ..
            } => bound.admits(*actual, *limit),
            Outcome::Requirement { satisfied, .. } => *satisfied,
            Outcome::Advisory(_) => true,
        }
    }

    fn label(&self) -> String {
        match self {
            Outcome::Limit {
                label, limit, bound, ..
            } => {
                let op = match bound {
                    Bound::AtMost => "<=",
                    Bound::AtLeast => ">=",
                };
                format!("{} ({} {})", label, op, format_number(*limit))
            }
            Outcome::Requirement { label, .. } => label.clone(),
            Outcome::Advisory(text) => text.clone(),
        }
    }
}

/// How a section turns its outcomes into a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Pass only when every limit and requirement passes
    AllChecks,
    /// Share of requirements satisfied, as a percentage
    CoveragePercent,
}

/// What a section computed before the verdict is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment<T> {
    pub thresholds: T,
    pub outcomes: Vec<Outcome>,
}

/// Evaluation options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Recommend a generic review for failed checks that carry no advice
    pub generic_advice: bool,
}

/// Section result together with the typed thresholds it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<T> {
    pub thresholds: T,
    pub result: SectionResult,
}

impl<T> Evaluation<T> {
    pub fn compliance(&self) -> bool {
        self.result.compliance()
    }

    pub fn recommendations(&self) -> &[String] {
        &self.result.recommendations
    }
}

/// One DB-SI section evaluator
pub trait Section {
    /// Raw user input for this section
    type Input;
    /// Values derived from the rule tables
    type Thresholds: Clone;

    const ID: SectionId;
    const VERDICT: Verdict = Verdict::AllChecks;

    /// Validate the input and apply the section's tables
    fn assess(
        context: &ProjectContext,
        input: &Self::Input,
    ) -> Result<Assessment<Self::Thresholds>, ValidationError>;

    /// Display rows for the report
    fn calculations(thresholds: &Self::Thresholds) -> Vec<Calculation>;
}

/// Run a section evaluator and draw its verdict
pub fn evaluate_section<S: Section>(
    context: &ProjectContext,
    input: &S::Input,
    options: &EvaluationOptions,
) -> Result<Evaluation<S::Thresholds>, ValidationError> {
    let assessment = S::assess(context, input)?;
    let status = verdict(S::VERDICT, &assessment.outcomes);
    let recommendations = recommendations(&assessment.outcomes, options);

    tracing::debug!(
        "{} evaluated: {} ({} recommendations)",
        S::ID,
        status.label(),
        recommendations.len()
    );

    let result = SectionResult {
        section_id: S::ID,
        title: S::ID.title(),
        status,
        thresholds: S::calculations(&assessment.thresholds),
        recommendations,
    };

    Ok(Evaluation {
        thresholds: assessment.thresholds,
        result,
    })
}

fn verdict(policy: Verdict, outcomes: &[Outcome]) -> ComplianceStatus {
    let checks: Vec<&Outcome> = outcomes.iter().filter(|o| o.is_check()).collect();
    match policy {
        Verdict::AllChecks => {
            if checks.iter().all(|o| o.passed()) {
                ComplianceStatus::Pass
            } else {
                ComplianceStatus::Fail
            }
        }
        Verdict::CoveragePercent => {
            if checks.is_empty() {
                return ComplianceStatus::PartialPercent(100.0);
            }
            let passed = checks.iter().filter(|o| o.passed()).count();
            ComplianceStatus::PartialPercent(passed as f64 * 100.0 / checks.len() as f64)
        }
    }
}

fn recommendations(outcomes: &[Outcome], options: &EvaluationOptions) -> Vec<String> {
    let mut recommendations = Vec::new();

    for outcome in outcomes {
        match outcome {
            Outcome::Advisory(text) => recommendations.push(text.clone()),
            Outcome::Limit { advice, .. } | Outcome::Requirement { advice, .. } => {
                if outcome.passed() {
                    continue;
                }
                if advice.is_empty() && options.generic_advice {
                    recommendations.push(format!("Review {}: requirement not met", outcome.label()));
                }
                recommendations.extend(advice.iter().cloned());
            }
        }
    }

    recommendations
}
