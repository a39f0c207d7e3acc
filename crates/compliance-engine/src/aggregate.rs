//! Report assembly
//!
//! Never fails: whatever sections have been evaluated go into the report,
//! missing ones are simply left out.

use std::collections::BTreeMap;

use shared_types::{Calculation, ProjectContext, ReportModel, SectionId, SectionResult};

use crate::extractors::numeric::format_number;

/// General data rows, in report order
pub fn general_data(context: &ProjectContext) -> Vec<Calculation> {
    vec![
        Calculation::new("Project name", context.project_name.clone()),
        Calculation::new("Building use", context.us_building.label()),
        Calculation::new("Total surface (m²)", format_number(context.total_surface)),
        Calculation::new("Evacuation height (m)", format_number(context.evacuation_height)),
        Calculation::new("Number of floors", format_number(context.floors)),
        Calculation::new("Maximum occupancy (persons)", format_number(context.max_occupancy)),
        Calculation::new("Location", context.building_location.label()),
    ]
}

/// Combine section results into a report
///
/// Sections are ordered SI 1 to SI 6. When a section appears more than
/// once the last result wins.
pub fn aggregate(context: &ProjectContext, results: Vec<SectionResult>) -> ReportModel {
    let mut by_section: BTreeMap<SectionId, SectionResult> = BTreeMap::new();
    for result in results {
        by_section.insert(result.section_id, result);
    }
    let sections: Vec<SectionResult> = by_section.into_values().collect();

    tracing::info!(
        "Aggregated report for '{}': {} sections, {} compliant",
        context.project_name,
        sections.len(),
        sections.iter().filter(|s| s.compliance()).count()
    );

    ReportModel {
        project_name: context.project_name.clone(),
        project_context: context.clone(),
        general_data: general_data(context),
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::project;
    use pretty_assertions::assert_eq;
    use shared_types::{BuildingUse, ComplianceStatus};

    fn result(section_id: SectionId, status: ComplianceStatus) -> SectionResult {
        SectionResult {
            section_id,
            title: section_id.title(),
            status,
            thresholds: vec![],
            recommendations: vec![],
        }
    }

    #[test]
    fn test_empty_aggregate() {
        let ctx = project(BuildingUse::Office, 10.0);
        let report = aggregate(&ctx, vec![]);
        assert!(report.sections.is_empty());
        assert_eq!(report.project_name, "Test project");
        assert_eq!(report.general_data.len(), 7);
    }

    #[test]
    fn test_sections_are_ordered_and_deduplicated() {
        let ctx = project(BuildingUse::Office, 10.0);
        let report = aggregate(
            &ctx,
            vec![
                result(SectionId::Si5, ComplianceStatus::Pass),
                result(SectionId::Si1, ComplianceStatus::Fail),
                result(SectionId::Si5, ComplianceStatus::Fail),
            ],
        );
        let ids: Vec<SectionId> = report.sections.iter().map(|s| s.section_id).collect();
        assert_eq!(ids, vec![SectionId::Si1, SectionId::Si5]);
        assert_eq!(report.sections[1].status, ComplianceStatus::Fail);
    }

    #[test]
    fn test_general_data_rows() {
        let ctx = project(BuildingUse::Hotel, 12.5);
        let rows = general_data(&ctx);
        assert_eq!(rows[1], Calculation::new("Building use", "Hotel"));
        assert_eq!(rows[3], Calculation::new("Evacuation height (m)", "12.5"));
        assert_eq!(rows[6], Calculation::new("Location", "Urban"));
    }
}
