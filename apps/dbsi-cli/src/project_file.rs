//! Project file format
//!
//! A JSON document holding the raw project form, the section inputs and
//! optional evaluation options. Numbers are strings, as typed in the form.

use std::path::Path;

use anyhow::{Context, Result};
use compliance_engine::{EvaluationOptions, ProjectForm, SectionInput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFile {
    pub project: ProjectForm,
    #[serde(default)]
    pub sections: Vec<SectionInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<EvaluationOptions>,
}

impl ProjectFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Invalid project file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Options from the file, with command-line switches applied on top
    pub fn options(&self, generic_advice: bool) -> EvaluationOptions {
        let mut options = self.options.clone().unwrap_or_default();
        options.generic_advice |= generic_advice;
        options
    }
}
