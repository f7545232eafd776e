//! Incremental QR-based QEF solver
//!
//! Folds every added plane into a small fixed-size triangular system instead
//! of storing planes explicitly, so any number of planes accumulates in
//! constant memory. The compressed state is a plain value ([`QefData`]) that
//! can be stored, exchanged and merged; merging two partial accumulations is
//! equivalent to having added all their planes to one solver, which is what
//! makes hierarchical (octree) simplification possible without revisiting
//! source planes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::QefSolver3D;

/// Working matrix rows (4 triangular + 4 insertion slots)
const ROWS: usize = 8;
/// Working matrix columns (3 spatial + right-hand side)
const COLS: usize = 4;

/// Serializable compressed QEF state
///
/// Packed nonzero coefficients of the upper-triangular factor, the residual
/// term, the mass-point running sum and the plane count. Round-trips through
/// [`QrQefSolver3D::data`] / [`QrQefSolver3D::from_data`] without loss and
/// composes under [`QrQefSolver3D::merge`] commutatively and associatively
/// (up to floating-point rounding).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QefData {
    /// Row 1 of the triangular factor
    pub a_11: f32,
    /// Row 1, column 2
    pub a_12: f32,
    /// Row 1, column 3
    pub a_13: f32,
    /// Row 1 right-hand side
    pub b_1: f32,
    /// Row 2 diagonal
    pub a_22: f32,
    /// Row 2, column 3
    pub a_23: f32,
    /// Row 2 right-hand side
    pub b_2: f32,
    /// Row 3 diagonal
    pub a_33: f32,
    /// Row 3 right-hand side
    pub b_3: f32,
    /// Accumulated squared residual (QEF value at the exact minimizer)
    pub r2: f32,
    /// Sum of all added points
    pub mass_point_sum: Vec3,
    /// Number of added points
    pub num_points: i16,
    /// Feature dimension detected at packing time
    pub feature_dim: i16,
}

/// QEF solver with constant-memory incremental QR accumulation
///
/// Maintains a 4-column by 8-row column-major working matrix holding the
/// upper-triangular factor of the accumulated least-squares system plus up
/// to four freshly inserted rows. Once the row budget is full, a pass of
/// Givens rotations re-triangularizes the matrix in place; the reduction is
/// orthogonal, so the represented least-squares objective is exact no matter
/// how many planes have been folded in.
#[derive(Debug, Clone)]
pub struct QrQefSolver3D {
    /// Column-major working matrix
    a: [[f32; ROWS]; COLS],
    points_sum: Vec3,
    added_points: i32,
    used_rows: usize,
    feature_dim: i16,
    tolerance: f32,
}

impl Default for QrQefSolver3D {
    fn default() -> Self {
        Self::new()
    }
}

impl QrQefSolver3D {
    /// Create an empty solver with the default rank tolerance of 0.01
    pub fn new() -> Self {
        QrQefSolver3D {
            a: [[0.0; ROWS]; COLS],
            points_sum: Vec3::ZERO,
            added_points: 0,
            used_rows: 0,
            feature_dim: 0,
            tolerance: 0.01,
        }
    }

    /// Reconstruct a solver from its compressed state
    pub fn from_data(data: &QefData) -> Self {
        let mut solver = Self::new();
        solver.merge(data);
        solver.feature_dim = data.feature_dim;
        solver
    }

    /// Set the rank-detection tolerance
    ///
    /// Diagonal (and relative eigenvalue) magnitudes below this threshold
    /// are treated as zero when classifying the system's rank. This is a
    /// precision/robustness trade-off: a looser tolerance treats more
    /// configurations as degenerate and snaps them toward the mass point,
    /// which suppresses spikes from nearly dependent planes but flattens
    /// genuinely sharp features.
    pub fn set_tolerance(&mut self, value: f32) {
        self.tolerance = value;
    }

    /// Current rank-detection tolerance
    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Feature dimension detected by the last `solve` or `data` call
    ///
    /// 3 means a corner, 2 an edge, 1 a flat patch, 0 no constraint.
    #[inline]
    pub fn feature_dim(&self) -> i16 {
        self.feature_dim
    }

    /// Number of planes folded in so far
    #[inline]
    pub fn num_planes(&self) -> i32 {
        self.added_points
    }

    /// Arithmetic mean of all added points (zero if none were added)
    pub fn mass_point(&self) -> Vec3 {
        if self.added_points == 0 {
            Vec3::ZERO
        } else {
            self.points_sum / self.added_points as f32
        }
    }

    /// Fold another solver's compressed state into this one
    ///
    /// Equivalent to having added all of the other accumulation's planes
    /// directly, in any order.
    pub fn merge(&mut self, data: &QefData) {
        self.push_row([data.a_11, data.a_12, data.a_13, data.b_1]);
        self.push_row([0.0, data.a_22, data.a_23, data.b_2]);
        self.push_row([0.0, 0.0, data.a_33, data.b_3]);
        self.push_row([0.0, 0.0, 0.0, data.r2.max(0.0).sqrt()]);
        self.points_sum += data.mass_point_sum;
        self.added_points += i32::from(data.num_points);
    }

    /// Pack the accumulated state into its serializable form
    ///
    /// Compresses the working matrix first, so the returned record is the
    /// full triangular factor.
    pub fn data(&mut self) -> QefData {
        self.compress();
        let dim = self.diag_rank();
        self.feature_dim = dim;
        QefData {
            a_11: self.a[0][0],
            a_12: self.a[1][0],
            a_13: self.a[2][0],
            b_1: self.a[3][0],
            a_22: self.a[1][1],
            a_23: self.a[2][1],
            b_2: self.a[3][1],
            a_33: self.a[2][2],
            b_3: self.a[3][2],
            r2: self.a[3][3] * self.a[3][3],
            mass_point_sum: self.points_sum,
            num_points: self.added_points.clamp(0, i16::MAX as i32) as i16,
            feature_dim: dim,
        }
    }

    /// Insert one row, compressing first if the row budget is exhausted
    fn push_row(&mut self, row: [f32; COLS]) {
        if self.used_rows == ROWS {
            self.compress();
        }
        let r = self.used_rows;
        for c in 0..COLS {
            self.a[c][r] = row[c];
        }
        self.used_rows += 1;
    }

    /// Reduce the working matrix to its upper-triangular core in place
    ///
    /// Eliminates every below-diagonal entry with a Givens rotation against
    /// the pivot row of its column. Orthogonal, so `eval` is unaffected; all
    /// rows beyond the 4-row core end up exactly zero.
    fn compress(&mut self) {
        let rows = self.used_rows;
        for col in 0..COLS.min(rows) {
            for row in (col + 1)..rows {
                let x = self.a[col][col];
                let y = self.a[col][row];
                if y == 0.0 {
                    continue;
                }
                let h = x.hypot(y);
                let c = x / h;
                let s = y / h;
                for k in col..COLS {
                    let u = self.a[k][col];
                    let w = self.a[k][row];
                    self.a[k][col] = c * u + s * w;
                    self.a[k][row] = c * w - s * u;
                }
                self.a[col][row] = 0.0;
            }
        }
        self.used_rows = rows.min(COLS);
    }

    /// Number of triangular diagonals above the tolerance
    fn diag_rank(&self) -> i16 {
        let mut dim = 0;
        for i in 0..3 {
            if self.a[i][i].abs() > self.tolerance {
                dim += 1;
            }
        }
        dim
    }

    /// Solve the full-rank triangular system
    fn back_substitute(&self) -> Vec3 {
        let z = self.a[3][2] / self.a[2][2];
        let y = (self.a[3][1] - self.a[2][1] * z) / self.a[1][1];
        let x = (self.a[3][0] - self.a[1][0] * y - self.a[2][0] * z) / self.a[0][0];
        Vec3::new(x, y, z)
    }

    /// Rank-deficient solve: project the mass point onto the solution subspace
    ///
    /// Rebuilds the 3x3 normal equations from the triangular factor (exact,
    /// since `AᵀA = RᵀR`), diagonalizes them, and corrects the mass point
    /// only along eigendirections whose eigenvalue is significant relative
    /// to the largest one. The remaining degrees of freedom stay at the mass
    /// point, which makes the minimizer unique and deterministic.
    fn project_mass_point(&mut self, mass_point: Vec3) -> Vec3 {
        let mut ata = [[0.0f32; 3]; 3];
        let mut atb = [0.0f32; 3];
        for r in 0..self.used_rows.min(3) {
            let row = [self.a[0][r], self.a[1][r], self.a[2][r]];
            let rhs = self.a[3][r];
            for i in 0..3 {
                for j in 0..3 {
                    ata[i][j] += row[i] * row[j];
                }
                atb[i] += row[i] * rhs;
            }
        }

        let (values, vectors) = jacobi_eigen(ata);
        let max_value = values.iter().fold(0.0f32, |m, &v| m.max(v.abs()));
        if max_value <= f32::EPSILON {
            self.feature_dim = 0;
            return mass_point;
        }

        // Residual of the normal equations at the mass point
        let mp = [mass_point.x, mass_point.y, mass_point.z];
        let mut d = [0.0f32; 3];
        for i in 0..3 {
            d[i] = atb[i] - (ata[i][0] * mp[0] + ata[i][1] * mp[1] + ata[i][2] * mp[2]);
        }

        let mut dim = 0;
        let mut x = mass_point;
        for i in 0..3 {
            if values[i].abs() > self.tolerance * max_value {
                let u = Vec3::new(vectors[0][i], vectors[1][i], vectors[2][i]);
                let ud = u.x * d[0] + u.y * d[1] + u.z * d[2];
                x += u * (ud / values[i]);
                dim += 1;
            }
        }
        self.feature_dim = dim;
        x
    }
}

impl QefSolver3D for QrQefSolver3D {
    fn add_plane(&mut self, point: Vec3, normal: Vec3) {
        debug_assert!(
            (normal.length_squared() - 1.0).abs() < 1e-4,
            "plane normal must be unit length"
        );
        self.push_row([normal.x, normal.y, normal.z, normal.dot(point)]);
        self.points_sum += point;
        self.added_points += 1;
    }

    fn solve(&mut self, min_point: Vec3, max_point: Vec3) -> Vec3 {
        debug_assert!(self.added_points > 0, "solve() without planes");
        self.compress();
        let mass_point = self.mass_point();

        let solution = if self.a[0][0].abs() > self.tolerance
            && self.a[1][1].abs() > self.tolerance
            && self.a[2][2].abs() > self.tolerance
        {
            self.feature_dim = 3;
            self.back_substitute()
        } else {
            self.project_mass_point(mass_point)
        };

        let solution = if solution.is_finite() {
            solution
        } else {
            mass_point
        };
        solution.clamp(min_point, max_point)
    }

    fn eval(&self, point: Vec3) -> f32 {
        let mut error = 0.0;
        for r in 0..self.used_rows {
            let d = self.a[0][r] * point.x + self.a[1][r] * point.y + self.a[2][r] * point.z
                - self.a[3][r];
            error += d * d;
        }
        error
    }

    fn reset(&mut self) {
        self.a = [[0.0; ROWS]; COLS];
        self.points_sum = Vec3::ZERO;
        self.added_points = 0;
        self.used_rows = 0;
        self.feature_dim = 0;
    }
}

/// Cyclic Jacobi diagonalization of a symmetric 3x3 matrix
///
/// Returns eigenvalues and the matching eigenvector columns. A handful of
/// sweeps is ample at this size.
fn jacobi_eigen(mut a: [[f32; 3]; 3]) -> ([f32; 3], [[f32; 3]; 3]) {
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    for _ in 0..12 {
        let off = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];
        if off <= 1e-14 {
            break;
        }
        for &(p, q) in &[(0usize, 1usize), (0, 2), (1, 2)] {
            let apq = a[p][q];
            if apq.abs() <= 1e-12 {
                continue;
            }
            let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            let app = a[p][p];
            let aqq = a[q][q];
            a[p][p] = app - t * apq;
            a[q][q] = aqq + t * apq;
            a[p][q] = 0.0;
            a[q][p] = 0.0;
            let r = 3 - p - q;
            let arp = a[r][p];
            let arq = a[r][q];
            a[r][p] = c * arp - s * arq;
            a[p][r] = a[r][p];
            a[r][q] = s * arp + c * arq;
            a[q][r] = a[r][q];

            for k in 0..3 {
                let vkp = v[k][p];
                let vkq = v[k][q];
                v[k][p] = c * vkp - s * vkq;
                v[k][q] = s * vkp + c * vkq;
            }
        }
    }
    ([a[0][0], a[1][1], a[2][2]], v)
}
