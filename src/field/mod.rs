//! Scalar field and root-finder interfaces
//!
//! A [`ScalarField`] defines the isosurface implicitly: negative values are
//! inside the surface, positive values outside (zero counts as inside). A
//! [`ZeroFinder`] locates the exact crossing of the zero level set along a
//! single lattice edge. Both are consumed as black boxes by
//! [`UniformGrid::fill`](crate::grid::UniformGrid::fill).

mod analytic;
mod zero_finder;

pub use analytic::{HalfSpaceField, SphereField};
pub use zero_finder::{BisectionZeroFinder, ZeroFinder};

use glam::DVec3;

use crate::material::Material;

/// Signed scalar field defining an isosurface
///
/// Implementations should be continuous over R^3, have a gradient (or at
/// least some approximation of one) defined everywhere, and be negative
/// inside the surface and positive outside.
///
/// `Sync` is required so that lattice sampling may evaluate the field from
/// multiple threads; implementations must not rely on interior mutability
/// without synchronization.
pub trait ScalarField: Sync {
    /// Signed value of the field at `point`
    fn value(&self, point: DVec3) -> f64;

    /// Gradient of the field at `point`
    ///
    /// Used to orient tangent planes at surface crossings; it does not need
    /// to be normalized.
    fn grad(&self, point: DVec3) -> DVec3;

    /// Material of the solid at `point`
    ///
    /// Called only for points where `value <= 0`. The sampled `value` is
    /// passed along so implementations do not have to recompute it.
    fn material(&self, point: DVec3, value: f64) -> Material {
        let _ = (point, value);
        Material::Stone
    }
}
