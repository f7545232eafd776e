//! Analytic sample fields
//!
//! Exact signed-distance fields with closed-form gradients, useful for tests,
//! benchmarks and as reference producers of surface data.

use glam::DVec3;

use crate::material::Material;

use super::ScalarField;

/// Signed distance field of a sphere
#[derive(Debug, Clone, Copy)]
pub struct SphereField {
    /// Sphere center
    pub center: DVec3,
    /// Sphere radius
    pub radius: f64,
    /// Material reported for inside samples
    pub material: Material,
}

impl SphereField {
    /// Create a sphere field
    pub fn new(center: DVec3, radius: f64, material: Material) -> Self {
        SphereField {
            center,
            radius,
            material,
        }
    }
}

impl ScalarField for SphereField {
    fn value(&self, point: DVec3) -> f64 {
        (point - self.center).length() - self.radius
    }

    fn grad(&self, point: DVec3) -> DVec3 {
        let d = point - self.center;
        // The gradient is undefined at the center; any unit vector will do.
        d.try_normalize().unwrap_or(DVec3::X)
    }

    fn material(&self, _point: DVec3, _value: f64) -> Material {
        self.material
    }
}

/// Signed distance field of a half-space (an infinite solid below a plane)
///
/// `value(p) = normal . p - offset`, so points with `normal . p <= offset`
/// are inside.
#[derive(Debug, Clone, Copy)]
pub struct HalfSpaceField {
    /// Unit plane normal, pointing out of the solid
    pub normal: DVec3,
    /// Plane offset along the normal
    pub offset: f64,
    /// Material reported for inside samples
    pub material: Material,
}

impl HalfSpaceField {
    /// Create a half-space field; `normal` must be unit length
    pub fn new(normal: DVec3, offset: f64, material: Material) -> Self {
        debug_assert!((normal.length_squared() - 1.0).abs() < 1e-9);
        HalfSpaceField {
            normal,
            offset,
            material,
        }
    }
}

impl ScalarField for HalfSpaceField {
    fn value(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.offset
    }

    fn grad(&self, _point: DVec3) -> DVec3 {
        self.normal
    }

    fn material(&self, _point: DVec3, _value: f64) -> Material {
        self.material
    }
}
