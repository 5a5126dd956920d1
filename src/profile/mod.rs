// Released under MIT License.

//! Reconstruction of the free-energy profile of a slow-growth simulation by
//! thermodynamic integration of the constraint force along the reaction
//! coordinate.

use std::path::Path;

use getset::Getters;

use crate::errors::ProfileError;

pub mod report;
pub mod segments;

use report::parse_report;
use segments::resolve_segments;

/// The reconstructed free-energy profile of one simulation: the concatenated
/// reaction-coordinate series and the cumulative free energy at each sample.
///
/// The curve is anchored at zero: `energies()[0] == 0.0`. It is not monotonic
/// in anything; it may rise and fall.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct FreeEnergyProfile {
    /// Reaction-coordinate samples in chronological order.
    #[getset(get = "pub")]
    coordinates: Vec<f64>,
    /// Cumulative free energy at each sample, starting at exactly 0.0.
    #[getset(get = "pub")]
    energies: Vec<f64>,
}

impl FreeEnergyProfile {
    /// Reconstruct the free-energy profile of the simulation in `dir`.
    ///
    /// The constraint series of all `RUN<k>` restart segments are parsed in
    /// ascending numeric order, followed by the base-level log if the
    /// simulation root carries a trailing one. This order equals simulation
    /// time and is load-bearing: thermodynamic integration is only physically
    /// meaningful along increasing time.
    ///
    /// Returns `Ok(None)` when the directory contains neither segments nor a
    /// base-level log: the simulation has not produced data yet, which is an
    /// expected state, not an error. Any log that exists but fails to parse
    /// propagates as a hard error and is never masked into the sentinel.
    pub fn collect(dir: &Path) -> Result<Option<Self>, ProfileError> {
        let segments = resolve_segments(dir)?;

        if segments.is_empty() && !report::report_exists(dir) {
            return Ok(None);
        }

        let mut coordinates = Vec::new();
        let mut forces = Vec::new();

        for segment in &segments {
            let (cc, b_m) = parse_report(segment.path())?.into_parts();
            coordinates.extend(cc);
            forces.extend(b_m);
        }

        // the simulation root may carry the final (unsegmented or trailing)
        // part of the trajectory
        if report::report_exists(dir) {
            let (cc, b_m) = parse_report(dir)?.into_parts();
            coordinates.extend(cc);
            forces.extend(b_m);
        }

        Ok(Some(Self::integrate(coordinates, forces)))
    }

    /// Integrate the constraint force over the reaction coordinate with the
    /// composite trapezoidal rule.
    fn integrate(coordinates: Vec<f64>, forces: Vec<f64>) -> Self {
        let mut energies = Vec::with_capacity(coordinates.len());
        energies.push(0.0);

        for i in 1..coordinates.len() {
            let increment =
                0.5 * (coordinates[i] - coordinates[i - 1]) * (forces[i] + forces[i - 1]);
            energies.push(energies[i - 1] + increment);
        }

        Self {
            coordinates,
            energies,
        }
    }

    /// The free-energy barrier of the profile: the peak-to-trough range of
    /// the curve, rounded to 2 decimal places.
    pub fn barrier(&self) -> f64 {
        let max = self
            .energies
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let min = self.energies.iter().copied().fold(f64::INFINITY, f64::min);

        ((max - min) * 100.0).round() / 100.0
    }
}

/// Convenience: the barrier of the simulation in `dir`, or `None` when the
/// simulation has not produced data yet.
pub fn barrier(dir: &Path) -> Result<Option<f64>, ProfileError> {
    Ok(FreeEnergyProfile::collect(dir)?.map(|profile| profile.barrier()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn write_report(dir: &Path, samples: &[(f64, f64)]) {
        let mut content = String::new();
        for (cc, b_m) in samples {
            content.push_str(&format!(
                "   cc>  R  const   {:.8}\n   b_m>   {:.8}\n",
                cc, b_m
            ));
        }
        std::fs::write(dir.join("REPORT"), content).unwrap();
    }

    #[test]
    fn test_trapezoidal_rule() {
        let profile =
            FreeEnergyProfile::integrate(vec![0.0, 1.0], vec![0.0, 4.0]);

        assert_eq!(profile.energies(), &vec![0.0, 2.0]);
        assert_relative_eq!(profile.barrier(), 2.0);
    }

    #[test]
    fn test_curve_starts_at_zero_and_matches_length() {
        let profile = FreeEnergyProfile::integrate(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 2.0, 0.0],
        );

        assert_eq!(profile.energies().len(), profile.coordinates().len());
        assert_eq!(profile.energies()[0], 0.0);
        assert_relative_eq!(profile.energies()[1], 1.0);
        assert_relative_eq!(profile.energies()[2], 2.0);
    }

    #[test]
    fn test_collect_unsegmented() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), &[(1.2, 0.0), (1.3, -1.0), (1.4, -2.0)]);

        let profile = FreeEnergyProfile::collect(dir.path()).unwrap().unwrap();
        assert_eq!(profile.coordinates().len(), 3);
        assert_eq!(profile.energies()[0], 0.0);
        assert_relative_eq!(profile.energies()[1], 0.5 * 0.1 * -1.0, epsilon = 1e-10);

        // re-running on identical input is deterministic
        let again = FreeEnergyProfile::collect(dir.path()).unwrap().unwrap();
        assert_eq!(profile, again);
    }

    #[test]
    fn test_collect_segments_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, samples) in [
            ("RUN1", [(1.0, 0.0), (1.1, 1.0)]),
            ("RUN2", [(1.2, 2.0), (1.3, 3.0)]),
        ] {
            let segment = dir.path().join(name);
            std::fs::create_dir(&segment).unwrap();
            write_report(&segment, &samples);
        }
        // trailing log at the simulation root comes last
        write_report(dir.path(), &[(1.4, 4.0), (1.5, 5.0)]);

        let profile = FreeEnergyProfile::collect(dir.path()).unwrap().unwrap();
        assert_eq!(
            profile.coordinates(),
            &vec![1.0, 1.1, 1.2, 1.3, 1.4, 1.5]
        );
    }

    #[test]
    fn test_collect_not_started_yet() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(FreeEnergyProfile::collect(dir.path()).unwrap(), None);
        assert_eq!(barrier(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_collect_missing_directory() {
        match FreeEnergyProfile::collect(Path::new("definitely/not/here")) {
            Err(ProfileError::DirectoryNotFound(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_segment_parse_failure_is_not_masked() {
        let dir = tempfile::tempdir().unwrap();
        let segment = dir.path().join("RUN1");
        std::fs::create_dir(&segment).unwrap();
        // truncated log: one force line missing
        std::fs::write(
            segment.join("REPORT"),
            "   cc>  R  const   1.0\n   b_m>   0.1\n   cc>  R  const   1.1\n",
        )
        .unwrap();

        match FreeEnergyProfile::collect(dir.path()) {
            Err(ProfileError::MismatchedSamples { .. }) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_segment_order_is_load_bearing() {
        // the same two segments concatenated in opposite orders must give
        // different barriers; guards against a sort-by-name regression
        let forward = FreeEnergyProfile::integrate(
            vec![1.0, 1.1, 1.2, 1.1],
            vec![0.0, 2.0, 2.0, -4.0],
        );
        let swapped = FreeEnergyProfile::integrate(
            vec![1.2, 1.1, 1.0, 1.1],
            vec![2.0, -4.0, 0.0, 2.0],
        );

        assert_ne!(forward.barrier(), swapped.barrier());
    }

    #[test]
    fn test_barrier_rounded_to_two_decimals() {
        let profile = FreeEnergyProfile::integrate(
            vec![0.0, 1.0],
            vec![0.0, 2.469],
        );

        assert_relative_eq!(profile.barrier(), 1.23);
    }
}
