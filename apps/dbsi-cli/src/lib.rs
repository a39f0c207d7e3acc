//! Command-line shell around the DB-SI compliance engine
//!
//! Loads a project file, evaluates its sections and writes the report.

pub mod commands;
pub mod project_file;

pub use project_file::ProjectFile;
