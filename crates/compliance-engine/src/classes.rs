//! Classification values shared by several sections
//!
//! - Euroclass reaction-to-fire classes (EN 13501-1), ranked D < C < B < A2 < A1
//! - Fire-resistance ratings (EI for separating elements, R for structure)
//! - Risk level of a sector or special-risk zone

use serde::{Deserialize, Serialize};

/// Reaction-to-fire class of a material
///
/// Variants are declared from worst to best so that `Ord` follows the
/// ranking used by the façade and cavity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Euroclass {
    D,
    C,
    B,
    A2,
    A1,
}

impl Euroclass {
    /// True when this class is at least as good as `required`
    pub fn satisfies(self, required: Euroclass) -> bool {
        self >= required
    }

    pub fn code(&self) -> &'static str {
        match self {
            Euroclass::A1 => "A1",
            Euroclass::A2 => "A2",
            Euroclass::B => "B",
            Euroclass::C => "C",
            Euroclass::D => "D",
        }
    }
}

impl std::fmt::Display for Euroclass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Euroclass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a1" => Ok(Euroclass::A1),
            "a2" => Ok(Euroclass::A2),
            "b" => Ok(Euroclass::B),
            "c" => Ok(Euroclass::C),
            "d" => Ok(Euroclass::D),
            other => Err(format!("Unknown reaction-to-fire class: {}", other)),
        }
    }
}

/// Fire-resistance rating in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "criteria", content = "minutes")]
pub enum FireRating {
    /// Integrity and insulation, for compartment boundaries
    #[serde(rename = "EI")]
    Ei(u16),
    /// Load-bearing capacity, for structural elements
    R(u16),
}

impl FireRating {
    pub fn minutes(&self) -> u16 {
        match self {
            FireRating::Ei(minutes) | FireRating::R(minutes) => *minutes,
        }
    }
}

impl std::fmt::Display for FireRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FireRating::Ei(minutes) => write!(f, "EI {}", minutes),
            FireRating::R(minutes) => write!(f, "R {}", minutes),
        }
    }
}

/// Intrinsic risk level declared for the building or sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("Unknown risk level: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euroclass_ranking() {
        assert!(Euroclass::D < Euroclass::C);
        assert!(Euroclass::C < Euroclass::B);
        assert!(Euroclass::B < Euroclass::A2);
        assert!(Euroclass::A2 < Euroclass::A1);
    }

    #[test]
    fn test_euroclass_satisfies_is_inclusive() {
        assert!(Euroclass::B.satisfies(Euroclass::B));
        assert!(Euroclass::A1.satisfies(Euroclass::B));
        assert!(!Euroclass::C.satisfies(Euroclass::B));
    }

    #[test]
    fn test_fire_rating_display() {
        assert_eq!(FireRating::Ei(90).to_string(), "EI 90");
        assert_eq!(FireRating::R(120).to_string(), "R 120");
        assert_eq!(FireRating::R(120).minutes(), 120);
    }

    #[test]
    fn test_parse_classes() {
        assert_eq!("A2".parse::<Euroclass>(), Ok(Euroclass::A2));
        assert!("e".parse::<Euroclass>().is_err());
        assert_eq!("HIGH".parse::<RiskLevel>(), Ok(RiskLevel::High));
    }
}
