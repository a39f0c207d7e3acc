//! Typst compilation wrapper with timeout and error handling

pub mod errors;
pub mod output;
pub mod render;

pub use errors::{CompileError, ErrorSeverity, RenderStatus, ServerError};
pub use output::OutputFormat;
#[cfg(feature = "server")]
pub use render::compile_document;
pub use render::compile_document_sync;

use std::collections::HashMap;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to render a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Raw Typst source or a `typst://templates/<name>` URI
    pub source: String,
    /// Variables injected into sys.inputs
    #[serde(default)]
    pub inputs: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub format: OutputFormat,
    /// Pixels per inch for PNG output
    pub ppi: Option<u32>,
    /// Clock seen by `datetime.today()`, the current time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<DateTime<Utc>>,
}

/// Response from rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResponse {
    pub status: RenderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<RenderArtifact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CompileError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CompileError>,
}

impl RenderResponse {
    /// The artifact of a successful render, or the diagnostics as an error
    pub fn into_artifact(self) -> Result<RenderArtifact, ServerError> {
        match self.artifact {
            Some(artifact) if self.status == RenderStatus::Success => Ok(artifact),
            _ => Err(ServerError::CompileError(self.errors)),
        }
    }
}

/// Rendered artifact with base64-encoded data
///
/// SVG and PNG artifacts hold every page stacked vertically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderArtifact {
    pub data_base64: String,
    pub mime_type: String,
    pub page_count: usize,
}

impl RenderArtifact {
    pub fn decode(&self) -> Result<Vec<u8>, ServerError> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.data_base64)?)
    }
}
