/// Vector relationships between the two meshes' dimension vectors.
///
/// Every function here is pure. Only the center of mass can be undefined,
/// which is reported as `None` so callers can skip the marker.
use nalgebra::Vector3;

/// A point with a scalar mass attached, input to [`center_of_mass_of`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassedVector {
    pub position: Vector3<f64>,
    pub mass: f64,
}

impl MassedVector {
    pub fn new(position: Vector3<f64>, mass: f64) -> Self {
        Self { position, mass }
    }
}

/// Elementwise sum `v1 + v2`
pub fn resultant(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Vector3<f64> {
    v1 + v2
}

/// Elementwise difference `v1 - v2`
pub fn difference(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Vector3<f64> {
    v1 - v2
}

/// Right-handed cross product `v1 × v2`; zero when the inputs are colinear
pub fn cross(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Vector3<f64> {
    v1.cross(v2)
}

/// Mass-weighted average `Σ(mᵢ·vᵢ) / Σmᵢ`.
///
/// Returns `None` when the slices differ in length or the masses sum to zero.
pub fn center_of_mass(vectors: &[Vector3<f64>], masses: &[f64]) -> Option<Vector3<f64>> {
    if vectors.len() != masses.len() {
        return None;
    }

    let total_mass: f64 = masses.iter().sum();
    if total_mass == 0.0 {
        return None;
    }

    let weighted = vectors
        .iter()
        .zip(masses)
        .fold(Vector3::zeros(), |acc, (v, &m)| acc + v * m);
    Some(weighted / total_mass)
}

/// [`center_of_mass`] over already-paired vectors and masses
pub fn center_of_mass_of(points: &[MassedVector]) -> Option<Vector3<f64>> {
    let (vectors, masses): (Vec<_>, Vec<_>) =
        points.iter().map(|p| (p.position, p.mass)).unzip();
    center_of_mass(&vectors, &masses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v1() -> Vector3<f64> {
        Vector3::new(2.0, 2.0, 6.0)
    }

    fn v2() -> Vector3<f64> {
        Vector3::new(4.0, 0.0, 2.0)
    }

    #[test]
    fn test_worked_example() {
        assert_relative_eq!(resultant(&v1(), &v2()), Vector3::new(6.0, 2.0, 8.0));
        assert_relative_eq!(difference(&v1(), &v2()), Vector3::new(-2.0, 2.0, 4.0));
        assert_relative_eq!(cross(&v1(), &v2()), Vector3::new(4.0, 20.0, -8.0));
        assert_relative_eq!(
            center_of_mass(&[v1(), v2()], &[1.0, 1.0]).unwrap(),
            Vector3::new(3.0, 1.0, 4.0)
        );
    }

    #[test]
    fn test_symmetries() {
        let samples = [
            (v1(), v2()),
            (Vector3::new(-1.5, 0.25, 9.0), Vector3::new(3.0, -7.0, 0.0)),
            (Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0)),
        ];
        for (a, b) in samples {
            assert_relative_eq!(resultant(&a, &b), resultant(&b, &a));
            assert_relative_eq!(difference(&a, &b), -difference(&b, &a));
            assert_relative_eq!(cross(&a, &b), -cross(&b, &a));
            assert_eq!(cross(&a, &a), Vector3::zeros());
        }
    }

    #[test]
    fn test_colinear_cross_is_zero() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(cross(&a, &(a * -4.0)), Vector3::zeros());
    }

    #[test]
    fn test_unit_masses_give_midpoint() {
        let a = Vector3::new(-3.0, 8.0, 0.5);
        let b = Vector3::new(1.0, -2.0, 4.5);
        assert_relative_eq!(
            center_of_mass(&[a, b], &[1.0, 1.0]).unwrap(),
            (a + b) / 2.0
        );
    }

    #[test]
    fn test_weighted_center_of_mass() {
        let com = center_of_mass(&[Vector3::zeros(), Vector3::new(4.0, 0.0, 0.0)], &[3.0, 1.0]);
        assert_relative_eq!(com.unwrap(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_center_of_mass_undefined() {
        assert_eq!(center_of_mass(&[v1(), v2()], &[1.0]), None);
        assert_eq!(center_of_mass(&[v1()], &[1.0, 1.0]), None);
        assert_eq!(center_of_mass(&[v1(), v2()], &[1.0, -1.0]), None);
        assert_eq!(center_of_mass(&[], &[]), None);
    }

    #[test]
    fn test_center_of_mass_of_pairs() {
        let points = [MassedVector::new(v1(), 1.0), MassedVector::new(v2(), 1.0)];
        assert_relative_eq!(center_of_mass_of(&points).unwrap(), Vector3::new(3.0, 1.0, 4.0));

        let cancelling = [MassedVector::new(v1(), 2.0), MassedVector::new(v2(), -2.0)];
        assert!(center_of_mass_of(&cancelling).is_none());
    }
}
