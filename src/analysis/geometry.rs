// Released under MIT License.

//! The geometry kernel: pairwise distance matrices and stable
//! nearest-neighbor queries.

use nalgebra::Vector3;

use crate::errors::GeometryError;
use crate::structure::SimCell;

use super::pbc::{NoPBC, PBCHandler, PBC3D};

/// Compute the matrix of Euclidean distances between two point sets.
///
/// When a simulation cell is supplied, distances follow the minimum-image
/// convention (each displacement component wrapped into [-L/2, L/2)).
/// NaN or infinite coordinates propagate as NaN distances so that callers can
/// detect corrupt structures; they are never silently clamped.
///
/// Fails with [`GeometryError::EmptyPointSet`] if either point set is empty.
pub fn distance_matrix(
    points_a: &[Vector3<f64>],
    points_b: &[Vector3<f64>],
    cell: Option<&SimCell>,
) -> Result<Vec<Vec<f64>>, GeometryError> {
    if points_a.is_empty() {
        return Err(GeometryError::EmptyPointSet("first"));
    }
    if points_b.is_empty() {
        return Err(GeometryError::EmptyPointSet("second"));
    }

    match cell {
        Some(cell) => Ok(matrix_with_handler(points_a, points_b, &PBC3D::new(cell))),
        None => Ok(matrix_with_handler(points_a, points_b, &NoPBC)),
    }
}

fn matrix_with_handler(
    points_a: &[Vector3<f64>],
    points_b: &[Vector3<f64>],
    pbc: &impl PBCHandler,
) -> Vec<Vec<f64>> {
    points_a
        .iter()
        .map(|a| points_b.iter().map(|b| pbc.distance(a, b)).collect())
        .collect()
}

/// Get the index of the smallest distance in a row and the distance itself.
///
/// On ties, the lowest index wins. NaN entries are never selected.
/// Returns `None` for an empty row or a row consisting entirely of NaNs.
pub fn nearest_index(row: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &distance) in row.iter().enumerate() {
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => (),
            _ => best = Some((i, distance)),
        }
    }

    best
}

/// Get the position `(row, column)` of the smallest entry of a distance matrix
/// and the entry itself. Rows take precedence over columns on ties.
pub(crate) fn nearest_entry(matrix: &[Vec<f64>]) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for (i, row) in matrix.iter().enumerate() {
        if let Some((j, distance)) = nearest_index(row) {
            match best {
                Some((_, _, best_distance)) if distance >= best_distance => (),
                _ => best = Some((i, j, distance)),
            }
        }
    }

    best
}
