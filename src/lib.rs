//! # isoqef
//!
//! Core building blocks for dual-contouring isosurface extraction:
//! a uniform lattice sampler with exact per-edge surface-crossing data,
//! and a family of quadratic-error-function (QEF) minimizers that place
//! one representative vertex per surface cell.
//!
//! ## Features
//!
//! - **UniformGrid**: samples a signed scalar field over a centered,
//!   power-of-two lattice, classifies materials by sign, and records the
//!   zero crossing (position, gradient, solid side, material) on every
//!   sign-change edge.
//! - **QEF solvers**: `GradientDescentQefSolver3D` (explicit plane storage,
//!   iterative) and `QrQefSolver3D` (constant-memory incremental QR
//!   accumulation with mergeable, serializable `QefData` state).
//! - **Field interfaces**: `ScalarField` / `ZeroFinder` traits plus analytic
//!   sample fields and a bisection root finder.
//!
//! ## Example
//!
//! ```rust
//! use isoqef::prelude::*;
//! use glam::{DVec3, IVec3};
//!
//! let field = SphereField::new(DVec3::ZERO, 1.0, Material::Stone);
//! let finder = BisectionZeroFinder::default();
//!
//! let mut grid = UniformGrid::new(8, DVec3::ZERO, 0.5).unwrap();
//! grid.fill(&field, &finder);
//!
//! // Place one vertex in a surface cell via QEF minimization.
//! let cell = IVec3::new(1, 1, 1);
//! let mut solver = QrQefSolver3D::new();
//! for (point, normal) in grid.cell_crossings(cell) {
//!     solver.add_plane(point.as_vec3(), normal.as_vec3());
//! }
//! ```

#![warn(missing_docs)]

pub mod field;
pub mod grid;
pub mod material;
pub mod qef;
pub mod types;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::field::{
        BisectionZeroFinder, HalfSpaceField, ScalarField, SphereField, ZeroFinder,
    };
    pub use crate::grid::{EdgeStorage, GridEdge, GridError, UniformGrid, BAD_INDEX};
    pub use crate::material::Material;
    pub use crate::qef::{
        BaseQefSolver3D, GradientDescentQefSolver3D, QefData, QefSolver3D, QrQefSolver3D,
    };
    pub use crate::types::Axis;
    pub use glam::{DVec3, IVec3, Vec3};
}

// Re-exports for convenience
pub use grid::UniformGrid;
pub use material::Material;
pub use qef::{QefSolver3D, QrQefSolver3D};
