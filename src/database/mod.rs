// Released under MIT License.

//! A small JSON-backed registry of slow-growth simulations, grouped into
//! named categories, with batch barrier reporting over a category.

use std::path::{Path, PathBuf};

use getset::Getters;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::colog_warn;
use crate::errors::{DatabaseError, ProfileError};
use crate::profile;

/// One registered simulation: where it lives relative to the base directory
/// and an optional free-form note.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Deserialize, Serialize)]
pub struct RunRecord {
    /// Path of the simulation directory, relative to the base directory
    /// supplied at reporting time.
    #[getset(get = "pub")]
    path: String,

    /// Free-form note about the run.
    #[getset(get = "pub")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl RunRecord {
    /// Create a new record for a simulation at `path` (relative to the base
    /// directory used for reporting).
    pub fn new(path: impl Into<String>, note: Option<String>) -> Self {
        Self {
            path: path.into(),
            note,
        }
    }
}

/// The run database: an ordered map of categories, each an ordered map of
/// run names to their records. Insertion order is preserved on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Database {
    categories: IndexMap<String, IndexMap<String, RunRecord>>,
}

impl Database {
    /// Create a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a database from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|error| DatabaseError::CouldNotRead {
            path: path.to_owned(),
            error,
        })?;

        serde_json::from_str(&content).map_err(|error| DatabaseError::CouldNotParse {
            path: path.to_owned(),
            error,
        })
    }

    /// Write the database to a JSON file, fully replacing its previous
    /// content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DatabaseError> {
        let path = path.as_ref();
        // serializing an in-memory map cannot fail; only the write can
        let content = serde_json::to_string_pretty(self).map_err(|error| {
            DatabaseError::CouldNotParse {
                path: path.to_owned(),
                error,
            }
        })?;

        std::fs::write(path, content).map_err(|error| DatabaseError::CouldNotWrite {
            path: path.to_owned(),
            error,
        })
    }

    /// Names of all categories, in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(|name| name.as_str())
    }

    /// Create a new category. Creating a category that already exists is a
    /// no-op with a warning; existing records are never touched.
    pub fn add_category(&mut self, name: &str) {
        if self.categories.contains_key(name) {
            colog_warn!("Category '{}' already exists. Nothing to do.", name);
            return;
        }

        self.categories.insert(name.to_owned(), IndexMap::new());
    }

    /// Register a new run in a category. Fails if the run name is already
    /// taken; use [`Database::update`] to change an existing record.
    pub fn add(&mut self, category: &str, name: &str, record: RunRecord) -> Result<(), DatabaseError> {
        let records = self
            .categories
            .get_mut(category)
            .ok_or_else(|| DatabaseError::CategoryNotFound(category.to_owned()))?;

        if records.contains_key(name) {
            return Err(DatabaseError::RecordExists {
                category: category.to_owned(),
                name: name.to_owned(),
            });
        }

        records.insert(name.to_owned(), record);
        Ok(())
    }

    /// Replace the record of an existing run.
    pub fn update(
        &mut self,
        category: &str,
        name: &str,
        record: RunRecord,
    ) -> Result<(), DatabaseError> {
        let records = self
            .categories
            .get_mut(category)
            .ok_or_else(|| DatabaseError::CategoryNotFound(category.to_owned()))?;

        if !records.contains_key(name) {
            return Err(DatabaseError::RecordNotFound {
                category: category.to_owned(),
                name: name.to_owned(),
            });
        }

        records.insert(name.to_owned(), record);
        Ok(())
    }

    /// All records of a category, in insertion order.
    pub fn records(
        &self,
        category: &str,
    ) -> Result<&IndexMap<String, RunRecord>, DatabaseError> {
        self.categories
            .get(category)
            .ok_or_else(|| DatabaseError::CategoryNotFound(category.to_owned()))
    }

    /// Scan `root` for simulation directories whose name contains `pattern`
    /// and register them in `category` under their directory names. Already
    /// registered names are skipped with a warning. Returns the number of
    /// newly registered runs.
    pub fn scan(
        &mut self,
        category: &str,
        root: &Path,
        pattern: &str,
    ) -> Result<usize, DatabaseError> {
        if !self.categories.contains_key(category) {
            return Err(DatabaseError::CategoryNotFound(category.to_owned()));
        }

        let entries = std::fs::read_dir(root).map_err(|error| DatabaseError::CouldNotScan {
            path: root.to_owned(),
            error,
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.contains(pattern))
            .collect();
        // read_dir order is platform-dependent
        names.sort();

        let mut added = 0;
        for name in names {
            match self.add(category, &name, RunRecord::new(name.clone(), None)) {
                Ok(()) => added += 1,
                Err(DatabaseError::RecordExists { .. }) => {
                    colog_warn!("Run '{}' is already registered. Skipping it.", name);
                }
                Err(error) => return Err(error),
            }
        }

        Ok(added)
    }

    /// Compute the barrier of every run registered in `category`, resolving
    /// record paths against `base`.
    ///
    /// A run that cannot be processed (missing directory, malformed log) is
    /// reported as a failure without aborting the rest of the batch. Runs
    /// that have not produced data yet get a row with no barrier.
    pub fn barrier_report(
        &self,
        category: &str,
        base: &Path,
    ) -> Result<BarrierReport, DatabaseError> {
        let mut rows = Vec::new();
        let mut failures = Vec::new();

        for (name, record) in self.records(category)? {
            match profile::barrier(&base.join(record.path())) {
                Ok(barrier) => rows.push(BarrierRow {
                    name: name.clone(),
                    barrier,
                    note: record.note().clone(),
                }),
                Err(error) => failures.push((name.clone(), error)),
            }
        }

        // ascending by barrier; not-yet-computable runs sink to the bottom
        rows.sort_by(|a, b| match (a.barrier, b.barrier) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(BarrierReport { rows, failures })
    }
}

/// One row of a barrier report.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct BarrierRow {
    /// Name of the run in the database.
    #[getset(get = "pub")]
    name: String,
    /// Barrier in eV, or `None` when the run has not produced data yet.
    #[getset(get = "pub")]
    barrier: Option<f64>,
    /// Note attached to the record, if any.
    #[getset(get = "pub")]
    note: Option<String>,
}

/// Barriers of all runs of a category, sorted ascending by barrier, plus the
/// runs that could not be processed.
#[derive(Debug, Getters)]
pub struct BarrierReport {
    /// Successfully processed runs, ascending by barrier.
    #[getset(get = "pub")]
    rows: Vec<BarrierRow>,
    /// Runs that failed to process, with the reason.
    #[getset(get = "pub")]
    failures: Vec<(String, ProfileError)>,
}
