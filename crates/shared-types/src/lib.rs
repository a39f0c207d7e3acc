pub mod building;
pub mod types;

pub use building::{BuildingLocation, BuildingUse, ProjectContext};
pub use types::{Calculation, ComplianceStatus, ReportModel, SectionId, SectionResult};
