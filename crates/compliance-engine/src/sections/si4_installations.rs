//! SI 4 - Fire protection installations
//!
//! The list of mandatory systems is built additively from use, area, height
//! and risk level. The section does not pass or fail: its status is the
//! share of required systems marked as installed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared_types::{BuildingUse, Calculation, ProjectContext, SectionId};

use crate::classes::RiskLevel;
use crate::engine::{Assessment, Outcome, Section, Verdict};
use crate::error::ValidationError;
use crate::extractors::numeric::format_quantity;
use crate::fields::FieldReader;
use crate::tables::{
    SI4_DETECTION_AREA, SI4_DRY_RISER_HEIGHT, SI4_EMERGENCY_LIGHTING_HEIGHT, SI4_HOSE_REEL_AREA,
    SI4_HOSE_REEL_HEIGHT, SI4_PUBLIC_ADDRESS_AREA, SI4_SMOKE_EXTRACTION_AREA, SI4_SPRINKLER_AREA,
};

/// Uses accepted by SI 4: the project uses plus public assembly
pub const INSTALLATION_USES: [BuildingUse; 8] = [
    BuildingUse::Residential,
    BuildingUse::Office,
    BuildingUse::Commercial,
    BuildingUse::Industrial,
    BuildingUse::Educational,
    BuildingUse::Healthcare,
    BuildingUse::Hotel,
    BuildingUse::Assembly,
];

/// Fire protection system, in the order it is listed in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionSystem {
    Extinguishers,
    /// Equipped fire hose reels (BIE)
    Bie,
    DryRiser,
    Detection,
    Alarm,
    Sprinklers,
    EmergencyLighting,
    Signage,
    PublicAddress,
    SmokeExtraction,
}

impl ProtectionSystem {
    pub fn code(&self) -> &'static str {
        match self {
            ProtectionSystem::Extinguishers => "extinguishers",
            ProtectionSystem::Bie => "bie",
            ProtectionSystem::DryRiser => "dry_riser",
            ProtectionSystem::Detection => "detection",
            ProtectionSystem::Alarm => "alarm",
            ProtectionSystem::Sprinklers => "sprinklers",
            ProtectionSystem::EmergencyLighting => "emergency_lighting",
            ProtectionSystem::Signage => "signage",
            ProtectionSystem::PublicAddress => "public_address",
            ProtectionSystem::SmokeExtraction => "smoke_extraction",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProtectionSystem::Extinguishers => "Portable fire extinguishers",
            ProtectionSystem::Bie => "Fire hose reels (BIE)",
            ProtectionSystem::DryRiser => "Dry riser",
            ProtectionSystem::Detection => "Automatic fire detection",
            ProtectionSystem::Alarm => "Fire alarm",
            ProtectionSystem::Sprinklers => "Automatic sprinklers",
            ProtectionSystem::EmergencyLighting => "Emergency lighting",
            ProtectionSystem::Signage => "Evacuation signage",
            ProtectionSystem::PublicAddress => "Public address system",
            ProtectionSystem::SmokeExtraction => "Smoke extraction",
        }
    }
}

impl std::fmt::Display for ProtectionSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ProtectionSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "extinguishers" => Ok(ProtectionSystem::Extinguishers),
            "bie" | "hose_reels" => Ok(ProtectionSystem::Bie),
            "dry_riser" => Ok(ProtectionSystem::DryRiser),
            "detection" => Ok(ProtectionSystem::Detection),
            "alarm" => Ok(ProtectionSystem::Alarm),
            "sprinklers" => Ok(ProtectionSystem::Sprinklers),
            "emergency_lighting" => Ok(ProtectionSystem::EmergencyLighting),
            "signage" => Ok(ProtectionSystem::Signage),
            "public_address" => Ok(ProtectionSystem::PublicAddress),
            "smoke_extraction" => Ok(ProtectionSystem::SmokeExtraction),
            other => Err(format!("Unknown protection system: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationsInput {
    pub us_building: String,
    pub total_area: String,
    pub building_height: String,
    pub risk_level: String,
    pub installed_systems: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallationsThresholds {
    pub us_building: BuildingUse,
    pub total_area: f64,
    pub building_height: f64,
    pub risk_level: RiskLevel,
    pub required_systems: Vec<ProtectionSystem>,
    pub installed_systems: BTreeSet<ProtectionSystem>,
    pub missing_systems: Vec<ProtectionSystem>,
    pub coverage_percent: f64,
}

/// Mandatory systems, without duplicates, in report order
pub fn required_systems(
    us_building: BuildingUse,
    area: f64,
    height: f64,
    risk: RiskLevel,
) -> Vec<ProtectionSystem> {
    use self::ProtectionSystem::*;

    let mut required = BTreeSet::from([Extinguishers]);

    if area > SI4_HOSE_REEL_AREA || height > SI4_HOSE_REEL_HEIGHT {
        required.insert(Bie);
    }
    if height > SI4_DRY_RISER_HEIGHT {
        required.insert(DryRiser);
    }
    let sleeping_use = matches!(us_building, BuildingUse::Healthcare | BuildingUse::Hotel);
    if sleeping_use || (area > SI4_DETECTION_AREA && risk == RiskLevel::High) {
        required.extend([Detection, Alarm]);
    }
    if risk == RiskLevel::High || area > SI4_SPRINKLER_AREA {
        required.insert(Sprinklers);
    }
    if height > SI4_EMERGENCY_LIGHTING_HEIGHT
        || sleeping_use
        || us_building == BuildingUse::Educational
    {
        required.extend([EmergencyLighting, Signage]);
    }
    if area > SI4_PUBLIC_ADDRESS_AREA {
        required.insert(PublicAddress);
    }
    if matches!(us_building, BuildingUse::Commercial | BuildingUse::Industrial)
        && area > SI4_SMOKE_EXTRACTION_AREA
    {
        required.insert(SmokeExtraction);
    }

    required.into_iter().collect()
}

fn list(systems: impl IntoIterator<Item = ProtectionSystem>) -> String {
    let labels: Vec<&str> = systems.into_iter().map(|s| s.label()).collect();
    if labels.is_empty() {
        "None".to_string()
    } else {
        labels.join(", ")
    }
}

pub struct Installations;

impl Section for Installations {
    type Input = InstallationsInput;
    type Thresholds = InstallationsThresholds;

    const ID: SectionId = SectionId::Si4;
    const VERDICT: Verdict = Verdict::CoveragePercent;

    fn assess(
        context: &ProjectContext,
        input: &InstallationsInput,
    ) -> Result<Assessment<InstallationsThresholds>, ValidationError> {
        let mut fields = FieldReader::new();
        let us_building = fields.choice_or("us_building", &input.us_building, context.us_building);
        let us_building = fields.accepted("us_building", us_building, &INSTALLATION_USES);
        let area = fields.number_or("total_area", &input.total_area, context.total_surface);
        let height =
            fields.number_or("building_height", &input.building_height, context.evacuation_height);
        let risk = fields.choice::<RiskLevel>("risk_level", &input.risk_level);
        let installed = fields.choices::<ProtectionSystem>("installed_systems", &input.installed_systems);

        let (Some(us_building), Some(area), Some(height), Some(risk), Some(installed)) =
            (us_building, area, height, risk, installed)
        else {
            return Err(fields.into_error(Some(Self::ID)));
        };
        fields.finish(Some(Self::ID))?;

        let required = required_systems(us_building, area, height, risk);
        let outcomes: Vec<Outcome> = required
            .iter()
            .map(|system| {
                Outcome::requirement(system.label(), installed.contains(system))
                    .advise(format!("Install {}", system.label().to_lowercase()))
            })
            .collect();

        let missing: Vec<ProtectionSystem> = required
            .iter()
            .copied()
            .filter(|s| !installed.contains(s))
            .collect();
        let coverage_percent = if required.is_empty() {
            100.0
        } else {
            (required.len() - missing.len()) as f64 * 100.0 / required.len() as f64
        };

        Ok(Assessment {
            thresholds: InstallationsThresholds {
                us_building,
                total_area: area,
                building_height: height,
                risk_level: risk,
                required_systems: required,
                installed_systems: installed,
                missing_systems: missing,
                coverage_percent,
            },
            outcomes,
        })
    }

    fn calculations(t: &InstallationsThresholds) -> Vec<Calculation> {
        vec![
            Calculation::new("Building use", t.us_building.label()),
            Calculation::new("Risk level", t.risk_level.label()),
            Calculation::new("Total area", format_quantity(t.total_area, "m²")),
            Calculation::new("Required systems", list(t.required_systems.iter().copied())),
            Calculation::new("Installed systems", list(t.installed_systems.iter().copied())),
            Calculation::new("Missing systems", list(t.missing_systems.iter().copied())),
            Calculation::new("Coverage", format!("{:.0}%", t.coverage_percent)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{evaluate_section, EvaluationOptions};
    use crate::test_support::project;
    use pretty_assertions::assert_eq;
    use shared_types::ComplianceStatus;
    use super::ProtectionSystem::*;

    fn input(risk: &str, installed: &[&str]) -> InstallationsInput {
        InstallationsInput {
            risk_level: risk.to_string(),
            installed_systems: installed.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_small_low_building_only_needs_extinguishers() {
        assert_eq!(
            required_systems(BuildingUse::Office, 300.0, 6.0, RiskLevel::Low),
            vec![Extinguishers]
        );
    }

    #[test]
    fn test_systems_accumulate() {
        assert_eq!(
            required_systems(BuildingUse::Commercial, 2500.0, 30.0, RiskLevel::Medium),
            vec![
                Extinguishers,
                Bie,
                DryRiser,
                Sprinklers,
                EmergencyLighting,
                Signage,
                PublicAddress,
                SmokeExtraction
            ]
        );
        assert_eq!(
            required_systems(BuildingUse::Hotel, 400.0, 9.0, RiskLevel::Low),
            vec![Extinguishers, Detection, Alarm, EmergencyLighting, Signage]
        );
        assert_eq!(
            required_systems(BuildingUse::Industrial, 1200.0, 8.0, RiskLevel::High),
            vec![Extinguishers, Bie, Detection, Alarm, Sprinklers, SmokeExtraction]
        );
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(
            required_systems(BuildingUse::Office, 500.0, 15.0, RiskLevel::Low),
            vec![Extinguishers]
        );
    }

    #[test]
    fn test_coverage_percentage() {
        // 1000 m², 10 m, office, medium risk: extinguishers and hose reels
        let ctx = project(BuildingUse::Office, 10.0);
        let eval = evaluate_section::<Installations>(
            &ctx,
            &input("medium", &["extinguishers"]),
            &EvaluationOptions::default(),
        )
        .unwrap();
        assert_eq!(eval.thresholds.required_systems, vec![Extinguishers, Bie]);
        assert_eq!(eval.thresholds.coverage_percent, 50.0);
        assert_eq!(eval.result.status, ComplianceStatus::PartialPercent(50.0));
        assert!(!eval.compliance());
        assert_eq!(eval.recommendations(), ["Install fire hose reels (bie)"]);
    }

    #[test]
    fn test_full_coverage_is_compliant() {
        let ctx = project(BuildingUse::Office, 10.0);
        let eval = evaluate_section::<Installations>(
            &ctx,
            &input("low", &["extinguishers", "bie", "alarm"]),
            &EvaluationOptions::default(),
        )
        .unwrap();
        assert_eq!(eval.result.status, ComplianceStatus::PartialPercent(100.0));
        assert!(eval.compliance());
        assert!(eval.thresholds.missing_systems.is_empty());
    }

    #[test]
    fn test_assembly_override_is_accepted() {
        let ctx = project(BuildingUse::Office, 10.0);
        let eval = evaluate_section::<Installations>(
            &ctx,
            &InstallationsInput {
                us_building: "assembly".to_string(),
                ..input("low", &["extinguishers"])
            },
            &EvaluationOptions::default(),
        )
        .unwrap();
        assert_eq!(eval.thresholds.us_building, BuildingUse::Assembly);
        assert_eq!(eval.thresholds.required_systems, vec![Extinguishers, Bie]);

        let err = evaluate_section::<Installations>(
            &ctx,
            &InstallationsInput {
                us_building: "restaurant".to_string(),
                ..input("low", &["extinguishers"])
            },
            &EvaluationOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.fields, vec!["us_building".to_string()]);
    }

    #[test]
    fn test_unknown_system_code_is_rejected() {
        let ctx = project(BuildingUse::Office, 10.0);
        let err = evaluate_section::<Installations>(
            &ctx,
            &input("extreme", &["extinguishers", "halon"]),
            &EvaluationOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.fields, vec!["risk_level", "installed_systems"]);
    }
}
