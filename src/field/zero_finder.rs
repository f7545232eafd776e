//! Root finders for locating zero crossings along lattice edges

use glam::DVec3;

use crate::types::Axis;

use super::ScalarField;

/// Locates the zero crossing of a scalar field along an axis-aligned segment
///
/// Called by [`UniformGrid::fill`](crate::grid::UniformGrid::fill) for every
/// lattice edge whose endpoint signs differ. The root-finding method is up to
/// the implementation (bisection, secant, analytic); the returned coordinate
/// must lie within the given bounds.
pub trait ZeroFinder {
    /// Find the zero crossing along `axis`
    ///
    /// `lower` is the world-space position of the segment endpoint with the
    /// smaller coordinate along `axis`, and `hi` the larger coordinate of the
    /// other endpoint. `f0` and `f1` are the field values at the two
    /// endpoints; exactly one of them is `<= 0`. Returns the coordinate of
    /// the crossing along `axis`, in `[lower coordinate, hi)`.
    fn find_root(
        &self,
        axis: Axis,
        lower: DVec3,
        hi: f64,
        f0: f64,
        f1: f64,
        field: &dyn ScalarField,
    ) -> f64;
}

/// Step-limited bisection root finder
///
/// Halves the bracketing interval a fixed number of times and returns the
/// midpoint of the final bracket. Robust for any continuous field; accuracy
/// is `edge length / 2^(steps + 1)`.
#[derive(Debug, Clone, Copy)]
pub struct BisectionZeroFinder {
    /// Number of halving steps
    pub steps: u32,
}

impl Default for BisectionZeroFinder {
    fn default() -> Self {
        BisectionZeroFinder { steps: 8 }
    }
}

impl BisectionZeroFinder {
    /// Create a bisection finder with the given step count
    pub fn new(steps: u32) -> Self {
        BisectionZeroFinder { steps }
    }
}

impl ZeroFinder for BisectionZeroFinder {
    fn find_root(
        &self,
        axis: Axis,
        lower: DVec3,
        hi: f64,
        f0: f64,
        f1: f64,
        field: &dyn ScalarField,
    ) -> f64 {
        debug_assert!((f0 <= 0.0) != (f1 <= 0.0));
        let mut lo = axis.component(lower);
        let mut hi = hi;
        let inside_lo = f0 <= 0.0;
        for _ in 0..self.steps {
            let mid = 0.5 * (lo + hi);
            let fm = field.value(axis.with_component(lower, mid));
            if (fm <= 0.0) == inside_lo {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }
}
