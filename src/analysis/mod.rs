// Released under MIT License.

//! This module contains the implementation of the classification logic.

use getset::Getters;

use crate::colog_info;
use crate::errors::ClassificationError;
use crate::input::{CationKind, Classification};
use crate::structure::AtomicSystem;

pub mod geometry;
pub mod molecules;
pub(crate) mod pbc;
pub mod proximity;

use molecules::MoleculeGroup;
use proximity::{CationPopulation, ShellMembership, SurfaceContact};

/// Results of classifying a structure snapshot: detected molecular groups and
/// their proximity records.
#[derive(Debug, Clone, Getters)]
pub struct ClassificationResults {
    /// All detected water molecules, in enumeration order.
    #[getset(get = "pub")]
    water: Vec<MoleculeGroup>,
    /// The cation population of the system.
    #[getset(get = "pub")]
    cations: CationPopulation,
    /// Water molecules within the surface threshold, ranked by contact distance.
    #[getset(get = "pub")]
    water_contacts: Vec<SurfaceContact>,
    /// Molecular cations within the surface threshold, ranked by contact
    /// distance. Empty for monoatomic cations.
    #[getset(get = "pub")]
    cation_contacts: Vec<SurfaceContact>,
    /// Waters belonging to the cation hydration shell, ranked by the
    /// oxygen-cation distance.
    #[getset(get = "pub")]
    in_shell: Vec<ShellMembership>,
    /// Waters outside the cation hydration shell, ranked by the
    /// oxygen-cation distance.
    #[getset(get = "pub")]
    out_of_shell: Vec<ShellMembership>,
}

impl Classification {
    /// Perform the classification.
    pub fn run(&self) -> Result<ClassificationResults, ClassificationError> {
        let system = AtomicSystem::from_poscar(self.structure())?;
        colog_info!(
            "Read structure '{}' ('{}' atoms).",
            self.structure(),
            system.n_atoms()
        );

        let cell = if self.handle_pbc() {
            Some(system.cell()?)
        } else {
            None
        };

        let thresholds = self.thresholds();
        let water = molecules::detect_water(&system, thresholds.bonding(), cell.as_ref())?;
        colog_info!("Detected '{}' water molecules.", water.len());

        let cations = match self.cation() {
            CationKind::Sodium => CationPopulation::Atomic(system.indices_of("Na")),
            CationKind::Ammonium => CationPopulation::Molecular(molecules::detect_ammonium(
                &system,
                thresholds.bonding(),
                cell.as_ref(),
            )?),
            CationKind::Methylammonium => {
                CationPopulation::Molecular(molecules::detect_methylammonium(
                    &system,
                    thresholds.bonding(),
                    thresholds.carbon_bonding(),
                    cell.as_ref(),
                )?)
            }
        };
        colog_info!("Found '{}' {} cations.", cations.centers().len(), self.cation());

        let water_contacts = proximity::surface_contacts(
            &water,
            &system,
            self.surface_species(),
            thresholds.water_surface(),
            cell.as_ref(),
        )?;

        let cation_contacts = match (&cations, thresholds.cation_surface_threshold(self.cation()))
        {
            (CationPopulation::Molecular(groups), Some(threshold)) => proximity::surface_contacts(
                groups,
                &system,
                self.surface_species(),
                threshold,
                cell.as_ref(),
            )?,
            _ => Vec::new(),
        };

        let (in_shell, out_of_shell) = proximity::split_by_hydration_shell(
            &water,
            &system,
            &cations,
            thresholds.shell_threshold(self.cation()),
            cell.as_ref(),
        )?;

        colog_info!(
            "'{}' waters near the surface, '{}' in the hydration shell.",
            water_contacts.len(),
            in_shell.len()
        );

        Ok(ClassificationResults {
            water,
            cations,
            water_contacts,
            cation_contacts,
            in_shell,
            out_of_shell,
        })
    }
}
