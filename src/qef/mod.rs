//! Quadratic error function (QEF) minimization
//!
//! A QEF is the sum of squared signed distances from a candidate point to a
//! set of oriented planes; its minimizer best agrees with all the planes'
//! local tangent approximations of the surface. Dual contouring accumulates
//! one plane per crossing edge of a cell and places the cell's vertex at the
//! minimizer.
//!
//! Two strategies implement the [`QefSolver3D`] contract:
//!
//! - [`GradientDescentQefSolver3D`]: explicit plane storage (capacity 12),
//!   iterative relaxation solve. Cheap, bounded time, no closed form.
//! - [`QrQefSolver3D`]: no plane storage; constant-memory incremental QR
//!   accumulation, exact least-squares solve, mergeable/serializable state.

mod qr;

pub use qr::{QefData, QrQefSolver3D};

use glam::Vec3;

/// Interface for QEF minimizers
///
/// All implementations share the mass-point tie-break policy: when the
/// accumulated planes do not pin down a unique minimizer (a single plane,
/// parallel planes), `solve` returns the minimizer closest to the arithmetic
/// mean of all added points, which makes the answer deterministic.
pub trait QefSolver3D {
    /// Add a plane through `point` with unit normal `normal`
    ///
    /// The normal must be unit length; this is a caller contract and is only
    /// checked in debug builds.
    fn add_plane(&mut self, point: Vec3, normal: Vec3);

    /// Find the QEF minimizer
    ///
    /// The solution is reported within `[min_point, max_point]`; the box
    /// exists to prevent spike artifacts from ill-conditioned systems. At
    /// least one plane must have been added.
    fn solve(&mut self, min_point: Vec3, max_point: Vec3) -> Vec3;

    /// QEF value (sum of squared signed plane distances) at `point`
    fn eval(&self, point: Vec3) -> f32;

    /// Reset the solver to its initial, empty state
    fn reset(&mut self);
}

/// Plane accumulator with explicit bounded storage
///
/// Stores up to [`MAX_PLANES`](Self::MAX_PLANES) planes verbatim. A dual
/// contouring cell has 12 edges and each contributes at most one plane, so
/// the cap is a domain invariant rather than an arbitrary limit. Adding a
/// plane beyond capacity is a contract violation: it panics in debug builds
/// and overwrites the last slot in release builds.
///
/// This base accumulator does not know how to `solve`; see
/// [`GradientDescentQefSolver3D`] and [`QrQefSolver3D`] for that.
#[derive(Debug, Clone)]
pub struct BaseQefSolver3D {
    normals: [Vec3; Self::MAX_PLANES],
    coefs: [f32; Self::MAX_PLANES],
    /// Sum of added points
    mass_point_sum: Vec3,
    num_planes: usize,
}

impl Default for BaseQefSolver3D {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseQefSolver3D {
    /// Maximum number of storable planes
    pub const MAX_PLANES: usize = 12;

    /// Create an empty accumulator
    pub fn new() -> Self {
        BaseQefSolver3D {
            normals: [Vec3::ZERO; Self::MAX_PLANES],
            coefs: [0.0; Self::MAX_PLANES],
            mass_point_sum: Vec3::ZERO,
            num_planes: 0,
        }
    }

    /// Add a plane through `point` with unit normal `normal`
    pub fn add_plane(&mut self, point: Vec3, normal: Vec3) {
        debug_assert!(
            self.num_planes < Self::MAX_PLANES,
            "BaseQefSolver3D plane capacity ({}) exceeded",
            Self::MAX_PLANES
        );
        debug_assert!(
            (normal.length_squared() - 1.0).abs() < 1e-4,
            "plane normal must be unit length"
        );
        let slot = self.num_planes.min(Self::MAX_PLANES - 1);
        self.normals[slot] = normal;
        self.coefs[slot] = -normal.dot(point);
        self.mass_point_sum += point;
        self.num_planes = slot + 1;
    }

    /// QEF value at `point`
    pub fn eval(&self, point: Vec3) -> f32 {
        let mut error = 0.0;
        for i in 0..self.num_planes {
            let d = self.normals[i].dot(point) + self.coefs[i];
            error += d * d;
        }
        error
    }

    /// Reset to the empty state
    pub fn reset(&mut self) {
        self.mass_point_sum = Vec3::ZERO;
        self.num_planes = 0;
    }

    /// Number of accumulated planes
    #[inline]
    pub fn num_planes(&self) -> usize {
        self.num_planes
    }

    /// Arithmetic mean of all added points (zero if no planes were added)
    pub fn mass_point(&self) -> Vec3 {
        if self.num_planes == 0 {
            Vec3::ZERO
        } else {
            self.mass_point_sum / self.num_planes as f32
        }
    }
}

/// Iterative QEF solver over explicit plane storage
///
/// `solve` starts from the mass point and performs a fixed number of
/// steepest-descent steps on the mean squared plane distance; each step
/// moves against the gradient and projects the iterate back into the
/// solution box. Trades exactness for robustness and strictly bounded time.
#[derive(Debug, Clone)]
pub struct GradientDescentQefSolver3D {
    base: BaseQefSolver3D,
    step_count: u32,
    grad_step: f32,
}

impl Default for GradientDescentQefSolver3D {
    fn default() -> Self {
        Self::new()
    }
}

impl GradientDescentQefSolver3D {
    /// Create a solver with the default 10 steps of size 0.75
    pub fn new() -> Self {
        GradientDescentQefSolver3D {
            base: BaseQefSolver3D::new(),
            step_count: 10,
            grad_step: 0.75,
        }
    }

    /// Set the number of descent steps
    pub fn set_step_count(&mut self, value: u32) {
        self.step_count = value;
    }

    /// Set the descent step size
    ///
    /// Values in `(0, 2)` converge; larger values risk oscillation.
    pub fn set_grad_step(&mut self, value: f32) {
        self.grad_step = value;
    }

    /// Number of accumulated planes
    pub fn num_planes(&self) -> usize {
        self.base.num_planes()
    }

    /// Arithmetic mean of all added points
    pub fn mass_point(&self) -> Vec3 {
        self.base.mass_point()
    }
}

impl QefSolver3D for GradientDescentQefSolver3D {
    fn add_plane(&mut self, point: Vec3, normal: Vec3) {
        self.base.add_plane(point, normal);
    }

    fn solve(&mut self, min_point: Vec3, max_point: Vec3) -> Vec3 {
        debug_assert!(self.base.num_planes() > 0, "solve() without planes");
        let mut p = self.base.mass_point();
        let inv_count = 1.0 / self.base.num_planes as f32;
        for _ in 0..self.step_count {
            // Gradient of the mean squared plane distance; normalizing by the
            // plane count keeps the step stable for any grad_step below 2.
            let mut g = Vec3::ZERO;
            for i in 0..self.base.num_planes {
                let d = self.base.normals[i].dot(p) + self.base.coefs[i];
                g += d * self.base.normals[i];
            }
            p -= self.grad_step * inv_count * g;
            p = p.clamp(min_point, max_point);
        }
        p
    }

    fn eval(&self, point: Vec3) -> f32 {
        self.base.eval(point)
    }

    fn reset(&mut self) {
        self.base.reset();
    }
}
