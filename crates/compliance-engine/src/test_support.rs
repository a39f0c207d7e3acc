use shared_types::{BuildingLocation, BuildingUse, ProjectContext};

/// 1000 m², 3 floors, 100 people, urban
pub fn project(us_building: BuildingUse, evacuation_height: f64) -> ProjectContext {
    ProjectContext {
        project_name: "Test project".to_string(),
        us_building,
        total_surface: 1000.0,
        evacuation_height,
        floors: 3.0,
        max_occupancy: 100.0,
        building_location: BuildingLocation::Urban,
    }
}
