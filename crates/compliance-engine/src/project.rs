//! General project data form

use serde::{Deserialize, Serialize};
use shared_types::{BuildingLocation, BuildingUse, ProjectContext};

use crate::error::ValidationError;
use crate::fields::FieldReader;

/// Project data as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectForm {
    pub project_name: String,
    pub us_building: String,
    pub total_surface: String,
    pub evacuation_height: String,
    pub floors: String,
    pub max_occupancy: String,
    pub building_location: String,
}

impl ProjectForm {
    /// Build the context shared by all sections
    ///
    /// Every field is required. The error lists all offending fields and
    /// carries no section.
    pub fn validate(&self) -> Result<ProjectContext, ValidationError> {
        let mut fields = FieldReader::new();

        let project_name = fields.text("project_name", &self.project_name);
        let us_building = fields.choice::<BuildingUse>("us_building", &self.us_building);
        let us_building = fields.accepted("us_building", us_building, &BuildingUse::PROJECT);
        let total_surface = fields.number("total_surface", &self.total_surface);
        let evacuation_height = fields.number("evacuation_height", &self.evacuation_height);
        let floors = fields.number("floors", &self.floors);
        let max_occupancy = fields.number("max_occupancy", &self.max_occupancy);
        let building_location =
            fields.choice::<BuildingLocation>("building_location", &self.building_location);

        match (
            project_name,
            us_building,
            total_surface,
            evacuation_height,
            floors,
            max_occupancy,
            building_location,
        ) {
            (
                Some(project_name),
                Some(us_building),
                Some(total_surface),
                Some(evacuation_height),
                Some(floors),
                Some(max_occupancy),
                Some(building_location),
            ) => Ok(ProjectContext {
                project_name,
                us_building,
                total_surface,
                evacuation_height,
                floors,
                max_occupancy,
                building_location,
            }),
            _ => Err(fields.into_error(None)),
        }
    }
}
