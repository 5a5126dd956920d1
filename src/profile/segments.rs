// Released under MIT License.

//! Discovery and ordering of the restart segments of a slow-growth
//! simulation.

use std::path::{Path, PathBuf};

use getset::{CopyGetters, Getters};

use crate::errors::ProfileError;

/// One restart segment of a segmented simulation: a subdirectory named
/// `RUN<k>` holding the constraint log and structure files of that part of
/// the trajectory.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct RunSegment {
    /// Numeric index `k` of the `RUN<k>` directory.
    #[getset(get_copy = "pub")]
    index: u32,
    /// Absolute or caller-relative path of the segment directory.
    #[getset(get = "pub")]
    path: PathBuf,
}

/// Discover the restart segments of a simulation directory and order them by
/// their numeric index, ascending. `RUN10` sorts after `RUN9`, never
/// lexicographically.
///
/// An empty result means the simulation is a single unsegmented run; this is
/// not an error. Fails with [`ProfileError::DirectoryNotFound`] when the
/// simulation directory itself does not exist.
///
/// All returned paths are built from `dir`; the working directory of the
/// process is never consulted or changed.
pub fn resolve_segments(dir: &Path) -> Result<Vec<RunSegment>, ProfileError> {
    if !dir.is_dir() {
        return Err(ProfileError::DirectoryNotFound(dir.to_owned()));
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|_| ProfileError::DirectoryNotFound(dir.to_owned()))?;

    let mut segments = Vec::new();
    for entry in entries.flatten() {
        if !entry.path().is_dir() {
            continue;
        }

        let name = entry.file_name();
        let Some(index) = name
            .to_str()
            .and_then(|name| name.strip_prefix("RUN"))
            .and_then(|suffix| suffix.parse::<u32>().ok())
        else {
            continue;
        };

        if index >= 1 {
            segments.push(RunSegment {
                index,
                path: entry.path(),
            });
        }
    }

    segments.sort_by_key(|segment| segment.index());
    Ok(segments)
}
