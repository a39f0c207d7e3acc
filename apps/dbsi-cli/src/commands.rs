//! Subcommand implementations

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use compliance_engine::{ComplianceEngine, ValidationError};
use serde::Serialize;
use shared_types::{ReportModel, SectionResult};
use typst_engine::{DocumentRenderer, TypstRenderer};

use crate::project_file::ProjectFile;

/// Report model plus the sections that were rejected
#[derive(Debug, Serialize)]
pub struct Evaluated {
    pub report: ReportModel,
    pub rejected: Vec<ValidationError>,
}

/// Validate the project data and evaluate every section
///
/// Invalid project data aborts. Invalid sections are kept aside and the
/// rest are still evaluated.
pub fn evaluate_project(file: &ProjectFile, generic_advice: bool) -> Result<Evaluated> {
    let context = file
        .project
        .validate()
        .context("Project data is incomplete")?;
    let engine = ComplianceEngine::with_options(file.options(generic_advice));
    let (report, rejected) = engine.report(&context, &file.sections);

    for err in &rejected {
        tracing::warn!("{}", err);
    }
    Ok(Evaluated { report, rejected })
}

fn write_section(out: &mut String, result: &SectionResult) {
    let _ = writeln!(out, "{}: {}", result.title, result.status.label());
    for calc in &result.thresholds {
        let _ = writeln!(out, "    {}: {}", calc.label, calc.value);
    }
    for recommendation in &result.recommendations {
        let _ = writeln!(out, "  - {}", recommendation);
    }
}

/// Plain-text summary of an evaluation
pub fn format_text(evaluated: &Evaluated) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", evaluated.report.project_name);
    for row in &evaluated.report.general_data {
        let _ = writeln!(out, "  {}: {}", row.label, row.value);
    }
    for result in &evaluated.report.sections {
        out.push('\n');
        write_section(&mut out, result);
    }
    if !evaluated.rejected.is_empty() {
        out.push('\n');
        for err in &evaluated.rejected {
            let _ = writeln!(out, "Not evaluated: {}", err);
        }
    }
    out
}

pub fn format_json(evaluated: &Evaluated) -> Result<String> {
    Ok(serde_json::to_string_pretty(evaluated)?)
}

/// Render the report and write it under `out_dir`
pub async fn write_report(
    report: &ReportModel,
    renderer: &TypstRenderer,
    out_dir: &Path,
) -> Result<PathBuf> {
    let artifact = renderer
        .render_async(report)
        .await?
        .into_artifact()?;
    let bytes = artifact.decode()?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let path = out_dir.join(renderer.filename(report));
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Wrote {} ({} page(s))", path.display(), artifact.page_count);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::SectionId;
    use typst_engine::OutputFormat;

    const DEMO: &str = include_str!("../demos/office.json");

    fn demo() -> ProjectFile {
        ProjectFile::from_json(DEMO).unwrap()
    }

    #[test]
    fn test_demo_evaluates_every_section() {
        let evaluated = evaluate_project(&demo(), false).unwrap();
        assert!(evaluated.rejected.is_empty(), "{:?}", evaluated.rejected);
        let ids: Vec<SectionId> = evaluated.report.sections.iter().map(|s| s.section_id).collect();
        assert_eq!(ids, SectionId::ALL.to_vec());
    }

    #[test]
    fn test_invalid_section_is_reported_not_fatal() {
        let mut file = demo();
        file.sections.push(
            serde_json::from_str(r#"{ "section": "si2", "facade_height": "-3" }"#).unwrap(),
        );
        let evaluated = evaluate_project(&file, false).unwrap();
        assert_eq!(evaluated.rejected.len(), 1);
        assert_eq!(evaluated.rejected[0].section, Some(SectionId::Si2));

        let text = format_text(&evaluated);
        assert!(text.contains("Not evaluated: SI 2: missing or invalid fields: facade_height"));
    }

    #[test]
    fn test_invalid_project_aborts() {
        let mut file = demo();
        file.project.floors = "0".to_string();
        let err = evaluate_project(&file, false).unwrap_err();
        assert_eq!(err.to_string(), "Project data is incomplete");
        assert!(format!("{:#}", err).contains("floors"));
    }

    #[test]
    fn test_text_lists_sections() {
        let text = format_text(&evaluate_project(&demo(), false).unwrap());
        assert!(text.starts_with("Oficinas Diagonal 3\n"));
        assert!(text.contains("SI 1 - Interior fire spread: "));
        assert!(text.contains("SI 6 - Structural fire resistance: "));
    }

    #[test]
    fn test_json_output() {
        let json = format_json(&evaluate_project(&demo(), false).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report"]["sections"].as_array().unwrap().len(), 6);
        assert_eq!(value["rejected"], serde_json::json!([]));
    }

    /// Default page height (A4) in points
    const PAGE_HEIGHT_PT: f64 = 841.89;

    #[test]
    fn test_image_reports_keep_every_page() {
        let evaluated = evaluate_project(&demo(), false).unwrap();
        let pages = TypstRenderer::new(OutputFormat::Pdf)
            .render(&evaluated.report)
            .unwrap()
            .into_artifact()
            .unwrap()
            .page_count;

        let png = TypstRenderer::new(OutputFormat::Png)
            .with_ppi(72)
            .render(&evaluated.report)
            .unwrap()
            .into_artifact()
            .unwrap();
        assert_eq!(png.page_count, pages);
        let bytes = png.decode().unwrap();
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        assert!(height as f64 >= png.page_count as f64 * PAGE_HEIGHT_PT);

        let svg = TypstRenderer::new(OutputFormat::Svg)
            .render(&evaluated.report)
            .unwrap()
            .into_artifact()
            .unwrap();
        assert_eq!(svg.page_count, pages);
        let text = String::from_utf8(svg.decode().unwrap()).unwrap();
        let view_box = text.split("viewBox=\"").nth(1).unwrap();
        let view_box = &view_box[..view_box.find('"').unwrap()];
        let svg_height: f64 = view_box.split_whitespace().nth(3).unwrap().parse().unwrap();
        assert!(svg_height >= svg.page_count as f64 * PAGE_HEIGHT_PT);
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let evaluated = evaluate_project(&demo(), false).unwrap();
        let renderer = TypstRenderer::new(OutputFormat::Pdf);

        let path = write_report(&evaluated.report, &renderer, dir.path())
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("OficinasDiagonal3_REPORT.pdf"));
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
