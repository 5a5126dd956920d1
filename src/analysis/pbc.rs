// Released under MIT License.

//! Contains methods for computing distances with and without periodic
//! boundary conditions.

use nalgebra::Vector3;

use crate::structure::SimCell;

/// Trait implemented by structures handling (or intentionally not handling) PBC.
pub(crate) trait PBCHandler {
    /// Calculate the shortest vector connecting point1 with point2.
    fn vector_to(&self, point1: &Vector3<f64>, point2: &Vector3<f64>) -> Vector3<f64>;

    /// Calculate the distance between two points.
    #[inline]
    fn distance(&self, point1: &Vector3<f64>, point2: &Vector3<f64>) -> f64 {
        self.vector_to(point1, point2).norm()
    }
}

/// PBCHandler that ignores all periodic boundary conditions.
#[derive(Debug, Clone)]
pub(crate) struct NoPBC;

impl PBCHandler for NoPBC {
    #[inline(always)]
    fn vector_to(&self, point1: &Vector3<f64>, point2: &Vector3<f64>) -> Vector3<f64> {
        point2 - point1
    }
}

/// PBCHandler that assumes periodic boundary conditions in all three dimensions
/// of an orthorhombic cell.
#[derive(Debug, Clone)]
pub(crate) struct PBC3D {
    lengths: Vector3<f64>,
}

impl PBC3D {
    pub(crate) fn new(cell: &SimCell) -> Self {
        Self {
            lengths: cell.lengths(),
        }
    }
}

impl PBCHandler for PBC3D {
    /// Minimum-image convention: each displacement component is wrapped into
    /// [-L/2, L/2) before taking the norm.
    fn vector_to(&self, point1: &Vector3<f64>, point2: &Vector3<f64>) -> Vector3<f64> {
        let mut displacement = point2 - point1;
        for i in 0..3 {
            let length = self.lengths[i];
            if length > 0.0 {
                displacement[i] -= length * (displacement[i] / length + 0.5).floor();
            }
        }

        displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nopbc_distance() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(9.0, 0.0, 0.0);
        assert_relative_eq!(NoPBC.distance(&a, &b), 9.0);
    }

    #[test]
    fn test_pbc3d_minimum_image() {
        let pbc = PBC3D::new(&SimCell::new(10.0, 10.0, 10.0));

        let a = Vector3::new(0.5, 0.0, 0.0);
        let b = Vector3::new(9.5, 0.0, 0.0);
        // the shortest image goes through the boundary
        assert_relative_eq!(pbc.distance(&a, &b), 1.0);

        let c = Vector3::new(3.0, 4.0, 0.0);
        let origin = Vector3::new(0.0, 0.0, 0.0);
        assert_relative_eq!(pbc.distance(&origin, &c), 5.0);
    }

    #[test]
    fn test_pbc3d_half_box_is_wrapped_down() {
        let pbc = PBC3D::new(&SimCell::new(10.0, 10.0, 10.0));

        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(5.0, 0.0, 0.0);
        // displacement of exactly L/2 wraps to -L/2
        let vector = pbc.vector_to(&a, &b);
        assert_relative_eq!(vector.x, -5.0);
        assert_relative_eq!(pbc.distance(&a, &b), 5.0);
    }

    #[test]
    fn test_pbc3d_nan_propagates() {
        let pbc = PBC3D::new(&SimCell::new(10.0, 10.0, 10.0));

        let a = Vector3::new(f64::NAN, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        assert!(pbc.distance(&a, &b).is_nan());
    }
}
