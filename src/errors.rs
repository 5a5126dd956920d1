// Released under MIT License.

//! This module contains error types that can be returned by the `sgrowth` crate.

use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use thiserror::Error;

fn path_to_yellow(path: &Path) -> ColoredString {
    path.to_string_lossy().yellow()
}

/// Errors that can occur in the geometry kernel.
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("{} cannot compute distances for an empty set of {} points", "error:".red().bold(), .0.yellow())]
    EmptyPointSet(&'static str),
}

/// Errors that can occur when reading a structure file.
#[derive(Error, Debug)]
pub enum StructureError {
    #[error("{} file '{}' was not found or could not be read", "error:".red().bold(), path_to_yellow(.0))]
    FileNotFound(PathBuf),

    #[error("{} could not parse file '{}' (line {}): {}", "error:".red().bold(), path_to_yellow(.path), .line.to_string().yellow(), .reason)]
    CouldNotParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{} the simulation cell of '{}' is not orthorhombic; minimum-image distances are not supported for such cells ({} set '{}' to {})",
        "error:".red().bold(), path_to_yellow(.0), "hint:".blue().bold(), "handle_pbc".bright_blue(), "false".bright_blue())]
    NotOrthorhombicCell(PathBuf),

    #[error("{} atom index '{}' is out of range for a system of '{}' atoms", "error:".red().bold(), .index.to_string().yellow(), .n_atoms.to_string().yellow())]
    InvalidAtomIndex { index: usize, n_atoms: usize },
}

/// Errors that can occur when reconstructing a free-energy profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("{} simulation directory '{}' does not exist", "error:".red().bold(), path_to_yellow(.0))]
    DirectoryNotFound(PathBuf),

    #[error("{} no 'REPORT' or 'REPORT.gz' file found in '{}'", "error:".red().bold(), path_to_yellow(.0))]
    LogNotFound(PathBuf),

    #[error("{} constraint log '{}' contains '{}' coordinate samples but '{}' force samples (truncated write?)",
        "error:".red().bold(), path_to_yellow(.path), .n_coordinates.to_string().yellow(), .n_forces.to_string().yellow())]
    MismatchedSamples {
        path: PathBuf,
        n_coordinates: usize,
        n_forces: usize,
    },

    #[error("{} constraint log '{}' contains no constraint samples", "error:".red().bold(), path_to_yellow(.0))]
    NoSamples(PathBuf),

    #[error("{} could not parse field '{}' of line '{}' in constraint log '{}'",
        "error:".red().bold(), .field.yellow(), .line.yellow(), path_to_yellow(.path))]
    InvalidField {
        path: PathBuf,
        line: String,
        field: String,
    },

    #[error("{} could not read constraint log '{}': {}", "error:".red().bold(), path_to_yellow(.path), .error)]
    CouldNotReadLog {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Errors that can occur when working with the run database.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("{} could not read database file '{}': {}", "error:".red().bold(), path_to_yellow(.path), .error)]
    CouldNotRead {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{} could not parse database file '{}': {}", "error:".red().bold(), path_to_yellow(.path), .error)]
    CouldNotParse {
        path: PathBuf,
        error: serde_json::Error,
    },

    #[error("{} could not write database file '{}': {}", "error:".red().bold(), path_to_yellow(.path), .error)]
    CouldNotWrite {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{} category '{}' does not exist in the database", "error:".red().bold(), .0.yellow())]
    CategoryNotFound(String),

    #[error("{} record '{}' already exists in category '{}'", "error:".red().bold(), .name.yellow(), .category.yellow())]
    RecordExists { category: String, name: String },

    #[error("{} record '{}' does not exist in category '{}'", "error:".red().bold(), .name.yellow(), .category.yellow())]
    RecordNotFound { category: String, name: String },

    #[error("{} could not scan directory '{}': {}", "error:".red().bold(), path_to_yellow(.path), .error)]
    CouldNotScan {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Errors that can occur when constructing a `Classification` structure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{} the specified threshold '{}' ({} A) must be positive and finite", "error:".red().bold(), .name.yellow(), .value.to_string().yellow())]
    InvalidThreshold { name: &'static str, value: f64 },
}

/// Errors that can occur while running a classification.
#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("{}", .0)]
    StructureError(#[from] StructureError),

    #[error("{}", .0)]
    GeometryError(#[from] GeometryError),

    #[error("{}", .0)]
    ConfigError(#[from] ConfigError),
}

/// Errors that can occur when writing results.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("{} could not write results: {}", "error:".red().bold(), .0)]
    CouldNotWriteResults(std::io::Error),

    #[error("{} could not create file '{}'", "error:".red().bold(), path_to_yellow(.0))]
    CouldNotCreateFile(PathBuf),
}
