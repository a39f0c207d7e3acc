//! ReportModel to document
//!
//! The compliance engine hands over a [`ReportModel`]; this module turns it
//! into the `sys.inputs` view read by the `dbsi_report` template and names
//! the output file. Layout and pagination live in the template.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use shared_types::{Calculation, ReportModel, SectionResult};

use crate::compiler::errors::ServerError;
use crate::compiler::{compile_document_sync, OutputFormat, RenderRequest, RenderResponse};
use crate::templates::{template_uri, REPORT_TEMPLATE};

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^A-Za-z0-9]").unwrap();
}

/// Key under which the report is exposed to the template
pub const REPORT_INPUT: &str = "report";

/// Default compile budget for a report, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Serialize)]
struct ReportView<'a> {
    title: String,
    project_name: &'a str,
    compliant: bool,
    summary: String,
    general_data: &'a [Calculation],
    sections: Vec<SectionView<'a>>,
}

#[derive(Debug, Serialize)]
struct SectionView<'a> {
    title: &'a str,
    compliant: bool,
    status: String,
    calculations: &'a [Calculation],
    recommendations: &'a [String],
}

impl<'a> From<&'a SectionResult> for SectionView<'a> {
    fn from(result: &'a SectionResult) -> Self {
        Self {
            title: &result.title,
            compliant: result.compliance(),
            status: result.status.label(),
            calculations: &result.thresholds,
            recommendations: &result.recommendations,
        }
    }
}

fn summary(model: &ReportModel) -> String {
    let total = model.sections.len();
    let failing = model.sections.iter().filter(|s| !s.compliance()).count();
    match (total, failing) {
        (0, _) => "No sections evaluated".to_string(),
        (_, 0) => format!("All {} evaluated section(s) compliant", total),
        _ => format!("{} of {} evaluated section(s) non-compliant", failing, total),
    }
}

/// Template inputs for a report
pub fn report_inputs(
    model: &ReportModel,
) -> Result<HashMap<String, serde_json::Value>, ServerError> {
    let view = ReportView {
        title: format!("CTE DB-SI report - {}", model.project_name),
        project_name: &model.project_name,
        compliant: model.sections.iter().all(SectionResult::compliance),
        summary: summary(model),
        general_data: &model.general_data,
        sections: model.sections.iter().map(SectionView::from).collect(),
    };

    let mut inputs = HashMap::new();
    inputs.insert(REPORT_INPUT.to_string(), serde_json::to_value(view)?);
    Ok(inputs)
}

/// `{name}_REPORT.{ext}` with everything outside `[A-Za-z0-9]` removed
pub fn report_filename(project_name: &str, format: OutputFormat) -> String {
    let sanitized = NON_ALPHANUMERIC.replace_all(project_name, "");
    let stem = if sanitized.is_empty() {
        "Project"
    } else {
        sanitized.as_ref()
    };
    format!("{}_REPORT.{}", stem, format.extension())
}

/// Render a report on the current thread
pub fn render_report_sync(
    model: &ReportModel,
    renderer: &TypstRenderer,
) -> Result<RenderResponse, ServerError> {
    let response = compile_document_sync(renderer.request(model)?)?;
    log_rendered(model, renderer.format);
    Ok(response)
}

/// Render a report on the blocking pool, bounded by the renderer's timeout
#[cfg(feature = "server")]
pub async fn render_report(
    model: &ReportModel,
    renderer: &TypstRenderer,
) -> Result<RenderResponse, ServerError> {
    let request = renderer.request(model)?;
    let response = crate::compiler::compile_document(request, renderer.timeout_ms).await?;
    log_rendered(model, renderer.format);
    Ok(response)
}

fn log_rendered(model: &ReportModel, format: OutputFormat) {
    tracing::info!(
        "Rendered {} report for '{}' ({} section(s))",
        format,
        model.project_name,
        model.sections.len()
    );
}

/// Turns a report model into a document
pub trait DocumentRenderer {
    fn format(&self) -> OutputFormat;

    fn render(&self, model: &ReportModel) -> Result<RenderResponse, ServerError>;

    fn filename(&self, model: &ReportModel) -> String {
        report_filename(&model.project_name, self.format())
    }
}

/// Renders through the embedded Typst template
#[derive(Debug, Clone)]
pub struct TypstRenderer {
    pub format: OutputFormat,
    pub ppi: Option<u32>,
    pub timeout_ms: u64,
    /// Date printed in the footer, today when unset
    pub now: Option<DateTime<Utc>>,
}

impl TypstRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ppi: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            now: None,
        }
    }

    pub fn with_ppi(mut self, ppi: u32) -> Self {
        self.ppi = Some(ppi);
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Pin the report date
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn request(&self, model: &ReportModel) -> Result<RenderRequest, ServerError> {
        Ok(RenderRequest {
            source: template_uri(REPORT_TEMPLATE),
            inputs: report_inputs(model)?,
            format: self.format,
            ppi: self.ppi,
            now: self.now,
        })
    }

    #[cfg(feature = "server")]
    pub async fn render_async(&self, model: &ReportModel) -> Result<RenderResponse, ServerError> {
        render_report(model, self).await
    }
}

impl Default for TypstRenderer {
    fn default() -> Self {
        Self::new(OutputFormat::Pdf)
    }
}

impl DocumentRenderer for TypstRenderer {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn render(&self, model: &ReportModel) -> Result<RenderResponse, ServerError> {
        render_report_sync(model, self)
    }
}
