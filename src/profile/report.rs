// Released under MIT License.

//! Parser for the VASP `REPORT` constraint log of one simulation segment.
//!
//! During a slow-growth run, VASP writes one block per MD step into `REPORT`.
//! The line carrying the marker `cc` holds the instantaneous value of the
//! constrained reaction coordinate, the line carrying `b_m` holds the
//! conjugate constraint force (the Lagrange multiplier). Older runs are
//! usually archived with the log compressed to `REPORT.gz`.

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use getset::Getters;

use crate::errors::ProfileError;

/// Whitespace-separated field of a `cc` line carrying the coordinate value.
const CC_FIELD: usize = 3;
/// Whitespace-separated field of a `b_m` line carrying the force value.
const BM_FIELD: usize = 1;

/// The constraint time series of one segment: reaction-coordinate samples and
/// the matching constraint-force samples, one pair per recorded MD step.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct ReportData {
    /// Reaction-coordinate (`cc`) samples.
    #[getset(get = "pub")]
    coordinates: Vec<f64>,
    /// Constraint-force (`b_m`) samples.
    #[getset(get = "pub")]
    forces: Vec<f64>,
}

impl ReportData {
    /// Number of samples in the series.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Is the series empty?
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.coordinates, self.forces)
    }
}

/// Does the directory contain a constraint log in any accepted variant?
pub(crate) fn report_exists(dir: &Path) -> bool {
    dir.join("REPORT").is_file() || dir.join("REPORT.gz").is_file()
}

/// Parse the constraint log of one segment directory, reading `REPORT` or,
/// failing that, `REPORT.gz`.
///
/// A log producing no samples, or differing numbers of coordinate and force
/// samples (the signature of a truncated write), is a hard parse error and is
/// never silently repaired.
pub fn parse_report(dir: &Path) -> Result<ReportData, ProfileError> {
    let (path, content) = read_log(dir)?;

    let mut coordinates = Vec::new();
    let mut forces = Vec::new();

    // a line may in principle carry both markers; both filters are applied
    // independently, exactly as the series are extracted from real logs
    for line in content.lines() {
        if line.contains("cc") {
            coordinates.push(parse_field(line, CC_FIELD, &path)?);
        }
        if line.contains("b_m") {
            forces.push(parse_field(line, BM_FIELD, &path)?);
        }
    }

    if coordinates.is_empty() && forces.is_empty() {
        return Err(ProfileError::NoSamples(path));
    }

    if coordinates.len() != forces.len() {
        return Err(ProfileError::MismatchedSamples {
            path,
            n_coordinates: coordinates.len(),
            n_forces: forces.len(),
        });
    }

    Ok(ReportData {
        coordinates,
        forces,
    })
}

/// Read the raw log, decompressing if only the gzipped variant exists.
/// Invalid UTF-8 bytes are replaced, not fatal.
fn read_log(dir: &Path) -> Result<(PathBuf, String), ProfileError> {
    let plain = dir.join("REPORT");
    if plain.is_file() {
        let bytes = std::fs::read(&plain).map_err(|error| ProfileError::CouldNotReadLog {
            path: plain.clone(),
            error,
        })?;
        return Ok((plain, String::from_utf8_lossy(&bytes).into_owned()));
    }

    let gzipped = dir.join("REPORT.gz");
    if gzipped.is_file() {
        let file = std::fs::File::open(&gzipped).map_err(|error| ProfileError::CouldNotReadLog {
            path: gzipped.clone(),
            error,
        })?;

        let mut bytes = Vec::new();
        GzDecoder::new(file).read_to_end(&mut bytes).map_err(|error| {
            ProfileError::CouldNotReadLog {
                path: gzipped.clone(),
                error,
            }
        })?;
        return Ok((gzipped, String::from_utf8_lossy(&bytes).into_owned()));
    }

    Err(ProfileError::LogNotFound(dir.to_owned()))
}

fn parse_field(line: &str, field: usize, path: &Path) -> Result<f64, ProfileError> {
    let token = line.split_whitespace().nth(field);

    token
        .and_then(|token| parse_fortran_f64(token))
        .ok_or_else(|| ProfileError::InvalidField {
            path: path.to_owned(),
            line: line.trim().to_owned(),
            field: token.unwrap_or("<missing>").to_owned(),
        })
}

/// Parse a floating-point number, accepting the Fortran 'D' exponent marker
/// that VASP occasionally emits.
fn parse_fortran_f64(token: &str) -> Option<f64> {
    match token.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) if token.contains(['D', 'd']) => {
            token.replace(['D', 'd'], "E").parse::<f64>().ok()
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    const REPORT_TWO_STEPS: &str = "\
========================================
        MD step No.       1
========================================
  >Const_coord
   cc>  R  const   1.20000000
   b_m>   0.00000000
========================================
        MD step No.       2
========================================
  >Const_coord
   cc>  R  const   1.21000000
   b_m>  -0.35227000
";

    fn write_report(dir: &Path, content: &str) {
        std::fs::write(dir.join("REPORT"), content).unwrap();
    }

    #[test]
    fn test_parse_plain_report() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), REPORT_TWO_STEPS);

        let data = parse_report(dir.path()).unwrap();
        assert_eq!(data.len(), 2);
        assert_relative_eq!(data.coordinates()[0], 1.2);
        assert_relative_eq!(data.coordinates()[1], 1.21);
        assert_relative_eq!(data.forces()[0], 0.0);
        assert_relative_eq!(data.forces()[1], -0.35227);
    }

    #[test]
    fn test_parse_gzipped_report() {
        let dir = tempfile::tempdir().unwrap();
        let file = std::fs::File::create(dir.path().join("REPORT.gz")).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(REPORT_TWO_STEPS.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let data = parse_report(dir.path()).unwrap();
        assert_eq!(data.len(), 2);
        assert_relative_eq!(data.forces()[1], -0.35227);
    }

    #[test]
    fn test_plain_report_wins_over_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), REPORT_TWO_STEPS);
        // stale compressed log with different content
        let file = std::fs::File::create(dir.path().join("REPORT.gz")).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(b"   cc>  R  const   9.90000000\n   b_m>   1.00000000\n")
            .unwrap();
        encoder.finish().unwrap();

        let data = parse_report(dir.path()).unwrap();
        assert_relative_eq!(data.coordinates()[0], 1.2);
    }

    #[test]
    fn test_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        match parse_report(dir.path()) {
            Err(ProfileError::LogNotFound(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_report_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // force line of the second step lost in a truncated write
        write_report(
            dir.path(),
            "   cc>  R  const   1.20000000\n   b_m>   0.10000000\n   cc>  R  const   1.21000000\n",
        );

        match parse_report(dir.path()) {
            Err(ProfileError::MismatchedSamples {
                n_coordinates: 2,
                n_forces: 1,
                ..
            }) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_report_without_samples_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "no constraint block in this log\n");

        match parse_report(dir.path()) {
            Err(ProfileError::NoSamples(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_numeric_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "   cc>  R  const   garbage\n   b_m>   0.1\n");

        match parse_report(dir.path()) {
            Err(ProfileError::InvalidField { field, .. }) => assert_eq!(field, "garbage"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_fortran_exponent_marker() {
        let dir = tempfile::tempdir().unwrap();
        write_report(
            dir.path(),
            "   cc>  R  const   0.12000D+01\n   b_m>  -0.35227D+00\n",
        );

        let data = parse_report(dir.path()).unwrap();
        assert_relative_eq!(data.coordinates()[0], 1.2);
        assert_relative_eq!(data.forces()[0], -0.35227);
    }
}
