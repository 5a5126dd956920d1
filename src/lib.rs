// Released under MIT License.

//! # sgrowth: post-processing of VASP slow-growth simulations
//!
//! A crate for reconstructing free-energy profiles from VASP slow-growth
//! (constrained thermodynamic integration) simulations and for classifying
//! chemically relevant molecules near an electrode surface.
//!
//! ## Usage
//!
//! Run:
//!
//! ```bash
//! $ cargo add sgrowth
//! ```
//!
//! Import the crate in your Rust code:
//!
//! ```rust
//! use sgrowth::prelude::*;
//! ```
//!
//! `sgrowth` is also available as a command-line tool. You can install it using:
//!
//! ```bash
//! $ cargo install sgrowth
//! ```
//!
//! ## Quick examples
//!
//! Reconstruct the free-energy profile of a (possibly segmented) slow-growth
//! simulation and get its barrier:
//!
//! ```no_run
//! use sgrowth::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     match FreeEnergyProfile::collect(Path::new("slow_growth/5_Na_40_H2O_v1"))? {
//!         Some(profile) => println!("barrier: {:.2} eV", profile.barrier()),
//!         None => println!("Not started yet"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ***
//!
//! Detect water molecules near the electrode and split them by hydration-shell
//! membership:
//!
//! ```no_run
//! use sgrowth::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let classification = Classification::builder()
//!         .structure("slow_growth/5_Na_40_H2O_v1/POSCAR") // structure file
//!         .cation(CationKind::Sodium)                     // cation present in the system
//!         .build()?;                                      // build the classification
//!
//!     // Activate colog for logging (requires the `colog` crate)
//!     colog::init();
//!
//!     let results = classification.run()?;
//!     for contact in results.water_contacts() {
//!         println!("{}", contact);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ***
//!
//! Batch-report barriers for every run registered in a category of the run
//! database:
//!
//! ```no_run
//! use sgrowth::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let database = Database::load("database.json")?;
//!     let report = database.barrier_report("1_NH4_shuttling", Path::new("/data/HER_Au"))?;
//!     BarrierTable::new(&report).write(std::io::stdout().lock())?;
//!
//!     Ok(())
//! }
//! ```

/// Version of the `sgrowth` crate.
pub const SGROWTH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Message that should be added to every panic.
pub(crate) const PANIC_MESSAGE: &str =
    "\n\n\n            >>> THIS SHOULD NOT HAVE HAPPENED! PLEASE REPORT THIS ERROR <<<\n\n";

/// Log colored info message.
#[macro_export]
macro_rules! colog_info {
    ($msg:expr) => {
        log::info!($msg)
    };
    ($msg:expr, $($arg:expr),+ $(,)?) => {{
        use colored::Colorize;
        log::info!($msg, $( $arg.to_string().cyan() ),+)
    }};
}

/// Log colored warning message.
#[macro_export]
macro_rules! colog_warn {
    ($msg:expr) => {
        log::warn!($msg)
    };
    ($msg:expr, $($arg:expr),+ $(,)?) => {{
        use colored::Colorize;
        log::warn!($msg, $( $arg.to_string().yellow() ),+)
    }};
}

pub mod analysis;
pub mod database;
pub mod errors;
pub mod input;
pub mod presentation;
pub mod profile;
pub mod structure;

/// This module contains re-exported public structures of the `sgrowth` crate.
pub mod prelude {
    pub use super::analysis::{
        geometry::{distance_matrix, nearest_index},
        molecules::{MoleculeGroup, MoleculeKind},
        proximity::{CationContact, ShellMembership, SurfaceContact},
        ClassificationResults,
    };
    pub use super::database::{BarrierReport, BarrierRow, Database, RunRecord};
    pub use super::input::{CationKind, Classification, ClassificationBuilder, Thresholds};
    pub use super::presentation::BarrierTable;
    pub use super::profile::{
        report::ReportData,
        segments::{resolve_segments, RunSegment},
        FreeEnergyProfile,
    };
    pub use super::structure::{Atom, AtomicSystem, SimCell};
}
