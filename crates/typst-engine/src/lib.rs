//! Report rendering for DB-SI compliance results
//!
//! Turns a [`shared_types::ReportModel`] into a PDF, SVG or PNG by compiling
//! an embedded Typst template in an in-memory world.
//!
//! # Feature Flags
//!
//! - `server` (default): async `compile_document` / `render_report` with a timeout (requires tokio)
//! - `wasm`: sync only, use `compile_document_sync` / `render_report_sync`

pub mod compiler;
pub mod report;
pub mod templates;
pub mod world;

pub use compiler::{
    compile_document_sync, CompileError, OutputFormat, RenderArtifact, RenderRequest,
    RenderResponse, RenderStatus, ServerError,
};
pub use report::{
    render_report_sync, report_filename, report_inputs, DocumentRenderer, TypstRenderer,
};

#[cfg(feature = "server")]
pub use compiler::compile_document;
#[cfg(feature = "server")]
pub use report::render_report;
