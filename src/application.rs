// Released under MIT License.

//! Implementation of the command-line application.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sgrowth::prelude::*;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Post-processing of VASP slow-growth simulations.",
    long_about = "Reconstructs free-energy profiles of VASP slow-growth simulations and classifies molecules near an electrode surface."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Disable all standard output of the application.
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the free-energy barrier of one simulation directory.
    Barrier {
        /// Path to the simulation directory (segmented or not).
        dir: PathBuf,
    },

    /// Classify water molecules and cations in a structure snapshot.
    Classify {
        /// Path to a POSCAR/CONTCAR structure file.
        structure: String,

        /// Kind of the cation present in the system.
        #[arg(long, value_enum)]
        cation: Cation,

        /// Chemical species of the electrode surface.
        #[arg(long, default_value = "Au")]
        surface_species: String,

        /// Do not apply the minimum-image convention.
        #[arg(long)]
        no_pbc: bool,
    },

    /// Report the barriers of all runs registered in a database category.
    Report {
        /// Path to the JSON run database.
        database: PathBuf,

        /// Category of the database to report.
        category: String,

        /// Base directory that record paths are resolved against.
        #[arg(long, default_value = ".")]
        base: PathBuf,

        /// Width of the run-name column.
        #[arg(long, default_value_t = 45)]
        width: usize,
    },

    /// Scan a directory for simulations and register them in the database.
    Scan {
        /// Path to the JSON run database. Created if it does not exist.
        database: PathBuf,

        /// Category to register the runs in. Created if it does not exist.
        category: String,

        /// Directory to scan for simulation directories.
        root: PathBuf,

        /// Only register directories whose name contains this pattern.
        #[arg(long, default_value = "")]
        pattern: String,
    },
}

/// Command-line counterpart of [`CationKind`].
#[derive(ValueEnum, Debug, Clone, Copy)]
enum Cation {
    Na,
    Nh4,
    Ch3nh3,
}

impl From<Cation> for CationKind {
    fn from(cation: Cation) -> Self {
        match cation {
            Cation::Na => CationKind::Sodium,
            Cation::Nh4 => CationKind::Ammonium,
            Cation::Ch3nh3 => CationKind::Methylammonium,
        }
    }
}

/// Run the application. Returns `true` if successful, else returns `false`.
pub(crate) fn run() -> bool {
    let cli = Cli::parse();

    if !cli.silent {
        colog::init();
    }

    let result = match cli.command {
        Command::Barrier { dir } => barrier(&dir),
        Command::Classify {
            structure,
            cation,
            surface_species,
            no_pbc,
        } => classify(structure, cation.into(), surface_species, !no_pbc),
        Command::Report {
            database,
            category,
            base,
            width,
        } => report(&database, &category, &base, width),
        Command::Scan {
            database,
            category,
            root,
            pattern,
        } => scan(&database, &category, &root, &pattern),
    };

    match result {
        Ok(()) => true,
        Err(error) => {
            eprintln!("{}", error);
            false
        }
    }
}

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn barrier(dir: &std::path::Path) -> Result<(), AnyError> {
    match FreeEnergyProfile::collect(dir)? {
        Some(profile) => println!("{:.2}", profile.barrier()),
        None => println!("Not started yet"),
    }

    Ok(())
}

fn classify(
    structure: String,
    cation: CationKind,
    surface_species: String,
    handle_pbc: bool,
) -> Result<(), AnyError> {
    let classification = Classification::builder()
        .structure(structure)
        .cation(cation)
        .surface_species(surface_species)
        .handle_pbc(handle_pbc)
        .build()?;

    let results = classification.run()?;

    println!("Waters near the surface:");
    for contact in results.water_contacts() {
        println!("  {}", contact);
    }

    if !results.cation_contacts().is_empty() {
        println!("Cations near the surface:");
        for contact in results.cation_contacts() {
            println!("  {}", contact);
        }
    }

    println!("Waters in the hydration shell:");
    for membership in results.in_shell() {
        println!("  {}", membership);
    }

    println!("Waters outside the hydration shell:");
    for membership in results.out_of_shell() {
        println!("  {}", membership);
    }

    Ok(())
}

fn report(
    database: &std::path::Path,
    category: &str,
    base: &std::path::Path,
    width: usize,
) -> Result<(), AnyError> {
    let database = Database::load(database)?;
    let report = database.barrier_report(category, base)?;

    BarrierTable::new(&report)
        .with_name_width(width)
        .write(std::io::stdout().lock())?;

    Ok(())
}

fn scan(
    path: &std::path::Path,
    category: &str,
    root: &std::path::Path,
    pattern: &str,
) -> Result<(), AnyError> {
    let mut database = if path.is_file() {
        Database::load(path)?
    } else {
        Database::new()
    };

    database.add_category(category);
    let added = database.scan(category, root, pattern)?;
    database.save(path)?;

    println!("Registered {} new run(s) in category '{}'.", added, category);
    Ok(())
}
