//! Core rendering logic
//!
//! Compilation itself is synchronous. The async entry point runs it on the
//! blocking pool under a timeout.

use base64::Engine;
use typst::diag::{Severity, SourceDiagnostic};
use typst::layout::Abs;
use typst::model::Document;
use typst::syntax::{Source, Span};
use typst::visualize::Color;

use super::errors::{CompileError, RenderStatus, ServerError};
use super::output::OutputFormat;
use super::{RenderArtifact, RenderRequest, RenderResponse};
use crate::templates;
use crate::world::VirtualWorld;

/// Gap between stacked pages in SVG and PNG output
const PAGE_GAP_PT: f64 = 12.0;

/// Compile a Typst document with timeout
#[cfg(feature = "server")]
pub async fn compile_document(
    request: RenderRequest,
    timeout_ms: u64,
) -> Result<RenderResponse, ServerError> {
    let result = tokio::time::timeout(
        std::time::Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(move || compile_document_sync(request)),
    )
    .await;

    match result {
        Ok(Ok(response)) => response,
        Ok(Err(join_error)) => Err(ServerError::TaskFailed(join_error.to_string())),
        Err(_elapsed) => {
            tracing::warn!("Compilation exceeded {}ms", timeout_ms);
            Err(ServerError::Timeout(timeout_ms))
        }
    }
}

/// Compile a Typst document on the current thread
pub fn compile_document_sync(request: RenderRequest) -> Result<RenderResponse, ServerError> {
    let source = resolve_source(&request.source)?;
    let mut world = VirtualWorld::new(source, request.inputs)?;
    if let Some(now) = request.now {
        world = world.at(now);
    }

    let warned = typst::compile(&world);
    let (_, warnings) = categorize_diagnostics(world.main_source(), &warned.warnings);

    match warned.output {
        Ok(document) => {
            let artifact = export_document(&document, request.format, request.ppi)?;
            tracing::debug!(
                "Rendered {} page(s) as {}",
                artifact.page_count,
                request.format
            );
            Ok(RenderResponse {
                status: RenderStatus::Success,
                artifact: Some(artifact),
                errors: vec![],
                warnings,
            })
        }
        Err(diagnostics) => {
            let (errors, mut more_warnings) =
                categorize_diagnostics(world.main_source(), &diagnostics);
            if errors.is_empty() {
                return Err(ServerError::CompileError(vec![CompileError::new(
                    "Compilation failed without diagnostics",
                )]));
            }
            more_warnings.extend(warnings);
            Ok(RenderResponse {
                status: RenderStatus::Error,
                artifact: None,
                errors,
                warnings: more_warnings,
            })
        }
    }
}

fn resolve_source(source: &str) -> Result<String, ServerError> {
    match templates::parse_template_uri(source) {
        Some(name) => templates::get_template_source(name),
        None => Ok(source.to_string()),
    }
}

fn locate(source: &Source, span: Span, error: CompileError) -> CompileError {
    let position = source.range(span).and_then(|range| {
        let line = source.byte_to_line(range.start)?;
        let column = source.byte_to_column(range.start)?;
        Some((line + 1, column + 1))
    });
    match position {
        Some((line, column)) => error.with_location(line, column),
        None => error,
    }
}

fn export_document(
    document: &Document,
    format: OutputFormat,
    ppi: Option<u32>,
) -> Result<RenderArtifact, ServerError> {
    let bytes = match format {
        OutputFormat::Pdf => typst_pdf::pdf(document, &typst_pdf::PdfOptions::default())
            .map_err(|diags| {
                let messages: Vec<String> = diags.iter().map(|d| d.message.to_string()).collect();
                ServerError::ExportError(messages.join("; "))
            })?,
        OutputFormat::Svg => {
            ensure_pages(document)?;
            typst_svg::svg_merged(document, Abs::pt(PAGE_GAP_PT)).into_bytes()
        }
        OutputFormat::Png => {
            ensure_pages(document)?;
            let pixels_per_point = ppi.unwrap_or(144) as f32 / 72.0;
            typst_render::render_merged(
                document,
                pixels_per_point,
                Abs::pt(PAGE_GAP_PT),
                Some(Color::WHITE),
            )
            .encode_png()
            .map_err(|e| ServerError::ExportError(format!("PNG encoding failed: {}", e)))?
        }
    };

    Ok(RenderArtifact {
        data_base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
        mime_type: format.mime_type().to_string(),
        page_count: document.pages.len(),
    })
}

fn ensure_pages(document: &Document) -> Result<(), ServerError> {
    if document.pages.is_empty() {
        return Err(ServerError::ExportError("Document has no pages".to_string()));
    }
    Ok(())
}

/// Split diagnostics into errors and warnings, located in the main source
fn categorize_diagnostics(
    source: &Source,
    diagnostics: &[SourceDiagnostic],
) -> (Vec<CompileError>, Vec<CompileError>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for diag in diagnostics {
        let mut error = locate(source, diag.span, CompileError::new(diag.message.to_string()));
        if !diag.hints.is_empty() {
            let hint = diag
                .hints
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            error = error.with_hint(hint);
        }

        match diag.severity {
            Severity::Error => errors.push(error),
            Severity::Warning => warnings.push(error.as_warning()),
        }
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    const THREE_PAGES: &str = "First #pagebreak() Second #pagebreak() Third";

    /// Default page height (A4) in points
    const PAGE_HEIGHT_PT: f64 = 841.89;

    fn request(source: &str) -> RenderRequest {
        RenderRequest {
            source: source.to_string(),
            inputs: HashMap::new(),
            format: OutputFormat::Pdf,
            ppi: None,
            now: None,
        }
    }

    fn png_height(png: &[u8]) -> u32 {
        u32::from_be_bytes([png[20], png[21], png[22], png[23]])
    }

    fn svg_height(svg: &str) -> f64 {
        let view_box = svg.split("viewBox=\"").nth(1).unwrap();
        let view_box = &view_box[..view_box.find('"').unwrap()];
        view_box.split_whitespace().nth(3).unwrap().parse().unwrap()
    }

    #[test]
    fn test_compile_simple_document() {
        let response = compile_document_sync(request("Hello, *World*!")).unwrap();
        assert_eq!(response.status, RenderStatus::Success);
        let artifact = response.into_artifact().unwrap();
        assert_eq!(artifact.page_count, 1);
        assert!(artifact.decode().unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_compile_with_inputs() {
        let mut req = request(r#"#let name = sys.inputs.at("name", default: "World")
Hello, #name!"#);
        req.inputs.insert("name".to_string(), serde_json::json!("Alice"));
        let response = compile_document_sync(req).unwrap();
        assert_eq!(response.status, RenderStatus::Success);
    }

    #[test]
    fn test_compile_error_is_located() {
        let response = compile_document_sync(request("Hello\n#undefined_thing")).unwrap();
        assert_eq!(response.status, RenderStatus::Error);
        assert_eq!(response.errors[0].line, Some(2));
        assert!(response.clone().into_artifact().is_err());
    }

    #[test]
    fn test_svg_stacks_every_page() {
        let mut req = request(THREE_PAGES);
        req.format = OutputFormat::Svg;
        let artifact = compile_document_sync(req).unwrap().into_artifact().unwrap();
        assert_eq!(artifact.mime_type, "image/svg+xml");
        assert_eq!(artifact.page_count, 3);

        let svg = String::from_utf8(artifact.decode().unwrap()).unwrap();
        assert!(svg_height(&svg) >= 3.0 * PAGE_HEIGHT_PT);
    }

    #[test]
    fn test_png_stacks_every_page() {
        let mut req = request(THREE_PAGES);
        req.format = OutputFormat::Png;
        req.ppi = Some(72);
        let artifact = compile_document_sync(req).unwrap().into_artifact().unwrap();
        assert_eq!(artifact.page_count, 3);

        let png = artifact.decode().unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        // 72 ppi is one pixel per point
        assert!(png_height(&png) as f64 >= 3.0 * PAGE_HEIGHT_PT);
    }

    #[test]
    fn test_pinned_clock_reaches_today() {
        let source = "#assert.eq(datetime.today().display(\"[year]-[month]-[day]\"), \"2024-03-05\")";

        let mut req = request(source);
        req.now = Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap());
        assert_eq!(compile_document_sync(req).unwrap().status, RenderStatus::Success);

        let mut req = request(source);
        req.now = Some(Utc.with_ymd_and_hms(2031, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(compile_document_sync(req).unwrap().status, RenderStatus::Error);
    }

    #[test]
    fn test_unknown_template() {
        let err = compile_document_sync(request("typst://templates/missing")).unwrap_err();
        assert!(matches!(err, ServerError::TemplateNotFound(name) if name == "missing"));
    }

    #[cfg(feature = "server")]
    #[tokio::test]
    async fn test_async_compile() {
        let response = compile_document(request("Hello"), 10_000).await.unwrap();
        assert_eq!(response.status, RenderStatus::Success);
    }
}
