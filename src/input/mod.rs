// Released under MIT License.

//! Contains structures specifying what classification to perform and with
//! what parameters.

use std::fmt::{self, Display};
use std::fs::read_to_string;
use std::path::Path;

use derive_builder::Builder;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Kind of the cation present in the simulated electrolyte.
///
/// Carried explicitly in the configuration; never derived from path text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum CationKind {
    /// Na+.
    #[serde(alias = "Na", alias = "sodium")]
    Sodium,
    /// NH4+.
    #[serde(alias = "NH4", alias = "ammonium")]
    Ammonium,
    /// CH3NH3+.
    #[serde(alias = "CH3NH3", alias = "methylammonium")]
    Methylammonium,
}

impl CationKind {
    /// Default hydration-shell threshold (O-center distance, A) for the cation.
    pub fn default_shell_threshold(&self) -> f64 {
        match self {
            CationKind::Sodium => 2.6,
            // for molecular cations the shell is defined on the O-N distance
            CationKind::Ammonium | CationKind::Methylammonium => 3.2,
        }
    }

    /// Default surface threshold (dissociable-H to surface distance, A) for
    /// classifying the cation itself as surface-adjacent. Not applicable to
    /// monoatomic cations.
    pub fn default_surface_threshold(&self) -> Option<f64> {
        match self {
            CationKind::Sodium => None,
            CationKind::Ammonium => Some(5.6),
            CationKind::Methylammonium => Some(3.6),
        }
    }
}

impl Display for CationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CationKind::Sodium => write!(f, "Na"),
            CationKind::Ammonium => write!(f, "NH4"),
            CationKind::Methylammonium => write!(f, "CH3NH3"),
        }
    }
}

/// Distance thresholds (in A) governing molecule detection and proximity
/// classification.
#[derive(Debug, Clone, Copy, CopyGetters, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Thresholds {
    /// H-X bonding threshold for molecule detection.
    #[getset(get_copy = "pub")]
    bonding: f64,

    /// C-N bonding threshold for methylammonium detection.
    #[getset(get_copy = "pub")]
    carbon_bonding: f64,

    /// Surface threshold for water molecules.
    #[getset(get_copy = "pub")]
    water_surface: f64,

    /// Optional override of the cation surface threshold
    /// (defaults to the species-specific value of [`CationKind`]).
    #[getset(get_copy = "pub")]
    cation_surface: Option<f64>,

    /// Optional override of the hydration-shell threshold
    /// (defaults to the species-specific value of [`CationKind`]).
    #[getset(get_copy = "pub")]
    hydration_shell: Option<f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            bonding: 1.2,
            carbon_bonding: 1.55,
            water_surface: 2.6,
            cation_surface: None,
            hydration_shell: None,
        }
    }
}

impl Thresholds {
    /// Hydration-shell threshold to use for the given cation.
    pub fn shell_threshold(&self, cation: CationKind) -> f64 {
        self.hydration_shell
            .unwrap_or_else(|| cation.default_shell_threshold())
    }

    /// Surface threshold to use for the given cation, if it applies.
    pub fn cation_surface_threshold(&self, cation: CationKind) -> Option<f64> {
        self.cation_surface
            .or_else(|| cation.default_surface_threshold())
    }

    /// Check that all thresholds are positive and finite.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("bonding", Some(self.bonding)),
            ("carbon_bonding", Some(self.carbon_bonding)),
            ("water_surface", Some(self.water_surface)),
            ("cation_surface", self.cation_surface),
            ("hydration_shell", self.hydration_shell),
        ];

        for (name, value) in named {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigError::InvalidThreshold { name, value });
                }
            }
        }

        Ok(())
    }
}

/// Structure holding all the information necessary to classify the molecules
/// of a structure snapshot.
#[derive(Debug, Clone, Builder, Getters, CopyGetters, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Classification {
    /// Path to a POSCAR/CONTCAR file containing the structure of the system.
    #[builder(setter(into))]
    #[getset(get = "pub")]
    structure: String,

    /// Kind of the cation present in the system.
    #[getset(get_copy = "pub")]
    cation: CationKind,

    /// Chemical species of the electrode surface. Defaults to 'Au'.
    #[builder(setter(into), default = "String::from(\"Au\")")]
    #[serde(default = "default_surface_species")]
    #[getset(get = "pub")]
    surface_species: String,

    /// Distance thresholds for detection and classification.
    #[builder(default)]
    #[serde(default)]
    #[getset(get = "pub")]
    thresholds: Thresholds,

    /// Apply the minimum-image convention when computing distances?
    /// Defaults to true. Requires an orthorhombic cell.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    handle_pbc: bool,
}

fn default_surface_species() -> String {
    String::from("Au")
}

fn default_true() -> bool {
    true
}

impl Classification {
    /// Start constructing a classification.
    pub fn builder() -> ClassificationBuilder {
        ClassificationBuilder::default()
    }

    /// Construct a classification from a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = read_to_string(path.as_ref())?;
        let classification: Classification = serde_json::from_str(&content)?;
        classification.thresholds().validate()?;
        Ok(classification)
    }
}

impl ClassificationBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(thresholds) = &self.thresholds {
            thresholds.validate().map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let classification = Classification::builder()
            .structure("POSCAR")
            .cation(CationKind::Sodium)
            .build()
            .unwrap();

        assert_eq!(classification.structure(), "POSCAR");
        assert_eq!(classification.surface_species(), "Au");
        assert!(classification.handle_pbc());
        assert_eq!(classification.thresholds().bonding(), 1.2);
    }

    #[test]
    fn test_builder_rejects_invalid_threshold() {
        let thresholds = Thresholds {
            bonding: -1.0,
            ..Default::default()
        };

        assert!(Classification::builder()
            .structure("POSCAR")
            .cation(CationKind::Ammonium)
            .thresholds(thresholds)
            .build()
            .is_err());
    }

    #[test]
    fn test_shell_threshold_defaults() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.shell_threshold(CationKind::Sodium), 2.6);
        assert_eq!(thresholds.shell_threshold(CationKind::Ammonium), 3.2);
        assert_eq!(thresholds.shell_threshold(CationKind::Methylammonium), 3.2);

        let overridden = Thresholds {
            hydration_shell: Some(3.0),
            ..Default::default()
        };
        assert_eq!(overridden.shell_threshold(CationKind::Sodium), 3.0);
    }

    #[test]
    fn test_cation_surface_threshold_defaults() {
        let thresholds = Thresholds::default();
        assert_eq!(
            thresholds.cation_surface_threshold(CationKind::Ammonium),
            Some(5.6)
        );
        assert_eq!(
            thresholds.cation_surface_threshold(CationKind::Methylammonium),
            Some(3.6)
        );
        assert_eq!(thresholds.cation_surface_threshold(CationKind::Sodium), None);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "structure": "POSCAR",
            "cation": "NH4",
            "thresholds": { "water_surface": 3.0 }
        }"#;

        let classification: Classification = serde_json::from_str(json).unwrap();
        assert_eq!(classification.cation(), CationKind::Ammonium);
        assert_eq!(classification.thresholds().water_surface(), 3.0);
        assert_eq!(classification.thresholds().bonding(), 1.2);
    }
}
