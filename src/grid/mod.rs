//! Uniform lattice sampling and edge-crossing detection
//!
//! [`UniformGrid`] owns the voxelized representation of one cubic region:
//! a material per lattice vertex and three per-axis lists of surface-crossing
//! edges. [`UniformGrid::fill`] drives sampling and crossing detection using
//! external [`ScalarField`]/[`ZeroFinder`] collaborators; the addressing and
//! topology queries are pure functions of lattice coordinates consumed by a
//! downstream triangulation stage.
//!
//! Lattice coordinates are centered: each axis runs over
//! `[-half_size, half_size]`, and the flat material array is addressed by
//! `index = ((y + h) * (size + 1) + (x + h)) * (size + 1) + (z + h)`.

mod edge_storage;

pub use edge_storage::{EdgeStorage, GridEdge};

use glam::{DVec3, IVec3};
use rayon::prelude::*;
use thiserror::Error;

use crate::field::{ScalarField, ZeroFinder};
use crate::material::Material;
use crate::types::Axis;

/// Sentinel index for adjacency neighbors that fall outside the grid
pub const BAD_INDEX: u32 = u32::MAX;

/// Grid construction errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Size below the minimum of 2
    #[error("grid size {0} is too small, must be at least 2")]
    SizeTooSmall(u32),
    /// Size is not a power of two
    #[error("grid size {0} is not a power of two")]
    SizeNotPowerOfTwo(u32),
    /// Size above the maximum of 1024
    #[error("grid size {0} is too large, must not exceed 1024")]
    SizeTooLarge(u32),
}

/// Uniform cubic lattice with per-vertex materials and per-edge crossing data
///
/// Coordinate-based accessors assume valid input: callers must confirm
/// membership first via the `is_*_in_grid` predicates. Out-of-range
/// coordinates panic in debug builds and index arbitrarily in release builds.
#[derive(Debug)]
pub struct UniformGrid {
    size: u32,
    half_size: i32,
    global_pos: DVec3,
    grid_step: f64,
    materials: Vec<Material>,
    edges_x: EdgeStorage,
    edges_y: EdgeStorage,
    edges_z: EdgeStorage,
}

impl UniformGrid {
    /// Create a grid of `size` cells per axis
    ///
    /// `size` must be a power of two in `2..=1024`. `global_pos` is the
    /// world-space position of the lattice center, `grid_step` the edge
    /// length of one cell.
    pub fn new(size: u32, global_pos: DVec3, grid_step: f64) -> Result<Self, GridError> {
        if size < 2 {
            return Err(GridError::SizeTooSmall(size));
        }
        if !size.is_power_of_two() {
            return Err(GridError::SizeNotPowerOfTwo(size));
        }
        if size > 1024 {
            return Err(GridError::SizeTooLarge(size));
        }
        let dim = (size + 1) as usize;
        Ok(UniformGrid {
            size,
            half_size: (size / 2) as i32,
            global_pos,
            grid_step,
            materials: vec![Material::Empty; dim * dim * dim],
            edges_x: EdgeStorage::new(Axis::X),
            edges_y: EdgeStorage::new(Axis::Y),
            edges_z: EdgeStorage::new(Axis::Z),
        })
    }

    /// Number of cells per axis
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Half the size; lattice coordinates run over `[-half_size, half_size]`
    #[inline]
    pub fn half_size(&self) -> i32 {
        self.half_size
    }

    /// World-space position of the lattice center
    #[inline]
    pub fn global_pos(&self) -> DVec3 {
        self.global_pos
    }

    /// World-space edge length of one cell
    #[inline]
    pub fn grid_step(&self) -> f64 {
        self.grid_step
    }

    /// Number of lattice vertices, `(size + 1)^3`
    #[inline]
    pub fn data_size(&self) -> usize {
        self.materials.len()
    }

    /// Convert grid-local lattice coordinates to world space
    #[inline]
    pub fn local_to_global(&self, local: DVec3) -> DVec3 {
        self.global_pos + local * self.grid_step
    }

    /// Convert a world-space position to grid-local lattice coordinates
    #[inline]
    pub fn global_to_local(&self, global: DVec3) -> DVec3 {
        (global - self.global_pos) / self.grid_step
    }

    /// Crossing edges along the given axis, as recorded by the last `fill()`
    pub fn edges(&self, axis: Axis) -> &EdgeStorage {
        match axis {
            Axis::X => &self.edges_x,
            Axis::Y => &self.edges_y,
            Axis::Z => &self.edges_z,
        }
    }

    /// Sample `field` over the lattice and rebuild all three edge lists
    ///
    /// Every lattice vertex with `value <= 0` gets the material reported by
    /// the field at that point; vertices with positive values become
    /// [`Material::Empty`]. An exactly-zero sample always classifies as
    /// solid; this one-sided convention decides which edges count as
    /// crossings when the surface aligns with the lattice and must not be
    /// changed.
    ///
    /// For every edge whose endpoint signs differ, `finder` locates the zero
    /// along the edge and the crossing's offset, field gradient, solid side
    /// and material are recorded. May be called repeatedly; every call
    /// invalidates previously returned edge data.
    pub fn fill<F: ScalarField, Z: ZeroFinder>(&mut self, field: &F, finder: &Z) {
        // Vertex sampling is data parallel: one writer per lattice vertex.
        let grid = &*self;
        let sampled: Vec<(f64, Material)> = (0..grid.data_size() as u32)
            .into_par_iter()
            .map(|idx| {
                let p = grid.local_to_global(grid.index_to_point(idx).as_dvec3());
                let value = field.value(p);
                let material = if value > 0.0 {
                    Material::Empty
                } else {
                    field.material(p, value)
                };
                (value, material)
            })
            .collect();

        let mut values = Vec::with_capacity(sampled.len());
        for (i, (value, material)) in sampled.into_iter().enumerate() {
            values.push(value);
            self.materials[i] = material;
        }

        self.edges_x = self.scan_axis(Axis::X, &values, field, finder);
        self.edges_y = self.scan_axis(Axis::Y, &values, field, finder);
        self.edges_z = self.scan_axis(Axis::Z, &values, field, finder);
    }

    /// Scan all lattice edges parallel to `axis` for sign changes
    fn scan_axis<F: ScalarField, Z: ZeroFinder>(
        &self,
        axis: Axis,
        values: &[f64],
        field: &F,
        finder: &Z,
    ) -> EdgeStorage {
        let mut edges = EdgeStorage::new(axis);
        let h = self.half_size;
        let unit = axis.unit_ivec3();
        for y in -h..=h {
            for x in -h..=h {
                for z in -h..=h {
                    let lower = IVec3::new(x, y, z);
                    if !self.is_edge_in_grid(axis, lower) {
                        continue;
                    }
                    let upper = lower + unit;
                    let i1 = self.point_to_index(lower.x, lower.y, lower.z) as usize;
                    let i2 = self.point_to_index(upper.x, upper.y, upper.z) as usize;
                    let sign1 = values[i1] <= 0.0;
                    let sign2 = values[i2] <= 0.0;
                    if sign1 == sign2 {
                        continue;
                    }
                    let p0 = self.local_to_global(lower.as_dvec3());
                    let c0 = axis.component(p0);
                    let root =
                        finder.find_root(axis, p0, c0 + self.grid_step, values[i1], values[i2], field);
                    let gradient = field.grad(axis.with_component(p0, root));
                    let offset = (root - c0) / self.grid_step;
                    let material = if sign1 {
                        self.materials[i1]
                    } else {
                        self.materials[i2]
                    };
                    edges.add_edge(lower, offset, gradient, sign1, material);
                }
            }
        }
        edges
    }

    // -------------------------
    // Addressing
    // -------------------------

    /// Flat array index of the lattice vertex at `(x, y, z)`
    #[inline]
    pub fn point_to_index(&self, x: i32, y: i32, z: i32) -> u32 {
        debug_assert!(self.is_vertex_in_grid(IVec3::new(x, y, z)));
        let dim = self.size + 1;
        let h = self.half_size;
        let mut idx = (y + h) as u32 * dim;
        idx = (idx + (x + h) as u32) * dim;
        idx + (z + h) as u32
    }

    /// Lattice coordinates of the vertex with flat index `idx`
    ///
    /// Inverse of [`point_to_index`](Self::point_to_index) for all valid
    /// lattice coordinates.
    #[inline]
    pub fn index_to_point(&self, idx: u32) -> IVec3 {
        debug_assert!((idx as usize) < self.data_size());
        let dim = self.size + 1;
        let z = (idx % dim) as i32 - self.half_size;
        let idx = idx / dim;
        let x = (idx % dim) as i32 - self.half_size;
        let y = (idx / dim) as i32 - self.half_size;
        IVec3::new(x, y, z)
    }

    /// Material at the lattice vertex `(x, y, z)`
    #[inline]
    pub fn at(&self, x: i32, y: i32, z: i32) -> Material {
        self.materials[self.point_to_index(x, y, z) as usize]
    }

    /// Material at the lattice vertex `v`
    #[inline]
    pub fn material_at(&self, v: IVec3) -> Material {
        self.at(v.x, v.y, v.z)
    }

    // -------------------------
    // Operations on vertices
    // -------------------------

    /// Whether `v` is a valid lattice vertex
    pub fn is_vertex_in_grid(&self, v: IVec3) -> bool {
        v.x.abs() <= self.half_size && v.y.abs() <= self.half_size && v.z.abs() <= self.half_size
    }

    /// Whether `v` lies on the boundary of the lattice
    pub fn is_vertex_on_border(&self, v: IVec3) -> bool {
        v.x.abs() == self.half_size || v.y.abs() == self.half_size || v.z.abs() == self.half_size
    }

    // -------------------------
    // Operations on edges
    // -------------------------

    /// Whether the edge along `axis` with lower endpoint `edge_pos` is in the grid
    pub fn is_edge_in_grid(&self, axis: Axis, edge_pos: IVec3) -> bool {
        let h = self.half_size;
        let along = match axis {
            Axis::X => edge_pos.x,
            Axis::Y => edge_pos.y,
            Axis::Z => edge_pos.z,
        };
        if along < -h || along >= h {
            return false;
        }
        let (u, v) = axis.others();
        let a = match u {
            Axis::X => edge_pos.x,
            Axis::Y => edge_pos.y,
            Axis::Z => edge_pos.z,
        };
        let b = match v {
            Axis::X => edge_pos.x,
            Axis::Y => edge_pos.y,
            Axis::Z => edge_pos.z,
        };
        a.abs() <= h && b.abs() <= h
    }

    /// Whether the edge along `axis` lies on the boundary of the lattice
    ///
    /// An edge is on the border when either of its two cross coordinates is
    /// at the lattice extreme (its own axis coordinate does not matter).
    pub fn is_edge_on_border(&self, axis: Axis, edge_pos: IVec3) -> bool {
        let h = self.half_size;
        match axis {
            Axis::X => edge_pos.y.abs() == h || edge_pos.z.abs() == h,
            Axis::Y => edge_pos.x.abs() == h || edge_pos.z.abs() == h,
            Axis::Z => edge_pos.x.abs() == h || edge_pos.y.abs() == h,
        }
    }

    /// Indices of the (at most 4) cells sharing the given edge
    ///
    /// Cells are identified by the flat index of their minimal-corner vertex.
    /// Neighbors that would fall outside the grid are reported as
    /// [`BAD_INDEX`].
    pub fn adjacent_cells_for_edge(&self, axis: Axis, edge_pos: IVec3) -> [u32; 4] {
        debug_assert!(self.is_edge_in_grid(axis, edge_pos));
        let dim = self.size + 1;
        let dx = dim;
        let dy = dim * dim;
        let dz = 1u32;
        let h = self.half_size;
        let base = self.point_to_index(edge_pos.x, edge_pos.y, edge_pos.z);
        // Out-of-grid slots may wrap below zero here; they are overwritten
        // with the sentinel right after.
        let mut cells = match axis {
            Axis::X => [
                base.wrapping_sub(dy).wrapping_sub(dz),
                base.wrapping_sub(dz),
                base,
                base.wrapping_sub(dy),
            ],
            Axis::Y => [
                base.wrapping_sub(dx).wrapping_sub(dz),
                base.wrapping_sub(dx),
                base,
                base.wrapping_sub(dz),
            ],
            Axis::Z => [
                base.wrapping_sub(dx).wrapping_sub(dy),
                base.wrapping_sub(dy),
                base,
                base.wrapping_sub(dx),
            ],
        };
        match axis {
            Axis::X => {
                if edge_pos.y == -h {
                    cells[0] = BAD_INDEX;
                    cells[3] = BAD_INDEX;
                }
                if edge_pos.y == h {
                    cells[1] = BAD_INDEX;
                    cells[2] = BAD_INDEX;
                }
                if edge_pos.z == -h {
                    cells[0] = BAD_INDEX;
                    cells[1] = BAD_INDEX;
                }
                if edge_pos.z == h {
                    cells[2] = BAD_INDEX;
                    cells[3] = BAD_INDEX;
                }
            }
            Axis::Y => {
                if edge_pos.x == -h {
                    cells[0] = BAD_INDEX;
                    cells[1] = BAD_INDEX;
                }
                if edge_pos.x == h {
                    cells[2] = BAD_INDEX;
                    cells[3] = BAD_INDEX;
                }
                if edge_pos.z == -h {
                    cells[0] = BAD_INDEX;
                    cells[3] = BAD_INDEX;
                }
                if edge_pos.z == h {
                    cells[1] = BAD_INDEX;
                    cells[2] = BAD_INDEX;
                }
            }
            Axis::Z => {
                if edge_pos.x == -h {
                    cells[0] = BAD_INDEX;
                    cells[3] = BAD_INDEX;
                }
                if edge_pos.x == h {
                    cells[1] = BAD_INDEX;
                    cells[2] = BAD_INDEX;
                }
                if edge_pos.y == -h {
                    cells[0] = BAD_INDEX;
                    cells[1] = BAD_INDEX;
                }
                if edge_pos.y == h {
                    cells[2] = BAD_INDEX;
                    cells[3] = BAD_INDEX;
                }
            }
        }
        cells
    }

    // -------------------------
    // Operations on faces
    // -------------------------

    /// Whether the face with normal along `axis` at `face_pos` is in the grid
    ///
    /// A face is addressed by its minimal corner; its own axis coordinate
    /// spans the full lattice while the cross coordinates span cells.
    pub fn is_face_in_grid(&self, axis: Axis, face_pos: IVec3) -> bool {
        let h = self.half_size;
        let (along, a, b) = match axis {
            Axis::X => (face_pos.x, face_pos.y, face_pos.z),
            Axis::Y => (face_pos.y, face_pos.x, face_pos.z),
            Axis::Z => (face_pos.z, face_pos.x, face_pos.y),
        };
        along.abs() <= h && a >= -h && a < h && b >= -h && b < h
    }

    /// Whether the face with normal along `axis` lies on the lattice boundary
    pub fn is_face_on_border(&self, axis: Axis, face_pos: IVec3) -> bool {
        let along = match axis {
            Axis::X => face_pos.x,
            Axis::Y => face_pos.y,
            Axis::Z => face_pos.z,
        };
        along.abs() == self.half_size
    }

    // -------------------------
    // Operations on cells
    // -------------------------

    /// Whether `cell_pos` (minimal corner) is a valid cell
    pub fn is_cell_in_grid(&self, cell_pos: IVec3) -> bool {
        let h = self.half_size;
        cell_pos.x >= -h
            && cell_pos.y >= -h
            && cell_pos.z >= -h
            && cell_pos.x < h
            && cell_pos.y < h
            && cell_pos.z < h
    }

    /// Whether the cell touches the boundary of the lattice
    pub fn is_cell_on_border(&self, cell_pos: IVec3) -> bool {
        let h = self.half_size;
        cell_pos.x == -h
            || cell_pos.y == -h
            || cell_pos.z == -h
            || cell_pos.x == h - 1
            || cell_pos.y == h - 1
            || cell_pos.z == h - 1
    }

    /// Flat indices of the 8 vertices of the cell with minimal-corner index `cell_idx`
    ///
    /// Ordered by `z`, then `x`, then `y` offset (the original dual
    /// contouring corner order).
    pub fn adjacent_vertices_for_cell(&self, cell_idx: u32) -> [u32; 8] {
        let dim = self.size + 1;
        let dx = dim;
        let dy = dim * dim;
        let dz = 1u32;
        [
            cell_idx,
            cell_idx + dz,
            cell_idx + dx,
            cell_idx + dx + dz,
            cell_idx + dy,
            cell_idx + dy + dz,
            cell_idx + dx + dy,
            cell_idx + dx + dy + dz,
        ]
    }

    /// Materials at the 8 vertices of the cell, in corner order
    pub fn materials_of_cell(&self, cell_idx: u32) -> [Material; 8] {
        self.adjacent_vertices_for_cell(cell_idx)
            .map(|idx| self.materials[idx as usize])
    }

    /// Tangent-plane constraints from the crossing edges of one cell
    ///
    /// Collects, for each of the cell's 12 edges that carries a crossing, the
    /// world-space crossing position and the unit surface normal there.
    /// Crossings with a vanishing gradient are skipped. The result feeds
    /// directly into [`QefSolver3D::add_plane`](crate::qef::QefSolver3D::add_plane).
    pub fn cell_crossings(&self, cell: IVec3) -> Vec<(DVec3, DVec3)> {
        debug_assert!(self.is_cell_in_grid(cell));
        let mut planes = Vec::with_capacity(12);
        for axis in Axis::ALL {
            let (u, v) = axis.others();
            for du in 0..2 {
                for dv in 0..2 {
                    let lower = cell + u.unit_ivec3() * du + v.unit_ivec3() * dv;
                    if let Some(edge) = self.edges(axis).find(lower) {
                        if let Some(normal) = edge.gradient.try_normalize() {
                            planes.push((self.local_to_global(edge.surface_local(axis)), normal));
                        }
                    }
                }
            }
        }
        planes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{BisectionZeroFinder, HalfSpaceField};

    fn small_grid() -> UniformGrid {
        UniformGrid::new(4, DVec3::ZERO, 1.0).unwrap()
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            UniformGrid::new(1, DVec3::ZERO, 1.0).unwrap_err(),
            GridError::SizeTooSmall(1)
        );
        assert_eq!(
            UniformGrid::new(6, DVec3::ZERO, 1.0).unwrap_err(),
            GridError::SizeNotPowerOfTwo(6)
        );
        assert_eq!(
            UniformGrid::new(2048, DVec3::ZERO, 1.0).unwrap_err(),
            GridError::SizeTooLarge(2048)
        );
        assert!(UniformGrid::new(2, DVec3::ZERO, 1.0).is_ok());
        assert!(UniformGrid::new(1024, DVec3::ZERO, 1.0).is_ok());
    }

    #[test]
    fn test_index_round_trip() {
        let grid = small_grid();
        let h = grid.half_size();
        let mut seen = vec![false; grid.data_size()];
        for y in -h..=h {
            for x in -h..=h {
                for z in -h..=h {
                    let idx = grid.point_to_index(x, y, z);
                    assert_eq!(grid.index_to_point(idx), IVec3::new(x, y, z));
                    assert!(!seen[idx as usize], "index {} hit twice", idx);
                    seen[idx as usize] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s), "mapping is not onto");
    }

    #[test]
    fn test_vertex_predicates() {
        let grid = small_grid();
        assert!(grid.is_vertex_in_grid(IVec3::new(2, -2, 0)));
        assert!(!grid.is_vertex_in_grid(IVec3::new(3, 0, 0)));
        assert!(grid.is_vertex_on_border(IVec3::new(2, 0, 0)));
        assert!(!grid.is_vertex_on_border(IVec3::new(1, 1, 1)));
    }

    #[test]
    fn test_edge_predicates() {
        let grid = small_grid();
        // X edge needs x in [-h, h), other coords in [-h, h]
        assert!(grid.is_edge_in_grid(Axis::X, IVec3::new(1, 2, -2)));
        assert!(!grid.is_edge_in_grid(Axis::X, IVec3::new(2, 0, 0)));
        assert!(grid.is_edge_in_grid(Axis::Y, IVec3::new(2, 1, 0)));
        assert!(!grid.is_edge_in_grid(Axis::Y, IVec3::new(0, 2, 0)));
        assert!(grid.is_edge_on_border(Axis::X, IVec3::new(0, 2, 0)));
        assert!(!grid.is_edge_on_border(Axis::X, IVec3::new(-2, 1, 1)));
    }

    #[test]
    fn test_face_predicates() {
        let grid = small_grid();
        assert!(grid.is_face_in_grid(Axis::Z, IVec3::new(0, 0, 2)));
        assert!(!grid.is_face_in_grid(Axis::Z, IVec3::new(2, 0, 0)));
        assert!(grid.is_face_on_border(Axis::Z, IVec3::new(0, 0, -2)));
        assert!(!grid.is_face_on_border(Axis::Z, IVec3::new(0, 0, 1)));
    }

    #[test]
    fn test_cell_predicates() {
        let grid = small_grid();
        assert!(grid.is_cell_in_grid(IVec3::new(-2, -2, -2)));
        assert!(grid.is_cell_in_grid(IVec3::new(1, 1, 1)));
        assert!(!grid.is_cell_in_grid(IVec3::new(2, 0, 0)));
        assert!(grid.is_cell_on_border(IVec3::new(1, 0, 0)));
        assert!(!grid.is_cell_on_border(IVec3::new(0, 0, 0)));
    }

    #[test]
    fn test_adjacent_cells_interior_edge() {
        let grid = small_grid();
        let cells = grid.adjacent_cells_for_edge(Axis::X, IVec3::new(0, 0, 0));
        assert!(cells.iter().all(|&c| c != BAD_INDEX));
        // The edge's own lattice point is one of the cells
        assert!(cells.contains(&grid.point_to_index(0, 0, 0)));
        // All four cells are distinct
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(cells[i], cells[j]);
            }
        }
    }

    #[test]
    fn test_adjacent_cells_border_edge() {
        let grid = small_grid();
        let h = grid.half_size();
        // Edge on the -y, -z corner line: only one adjacent cell remains
        let cells = grid.adjacent_cells_for_edge(Axis::X, IVec3::new(0, -h, -h));
        let valid: Vec<u32> = cells.iter().copied().filter(|&c| c != BAD_INDEX).collect();
        assert_eq!(valid, vec![grid.point_to_index(0, -h, -h)]);

        // Edge on a single border face: two cells remain
        let cells = grid.adjacent_cells_for_edge(Axis::Z, IVec3::new(-h, 0, 0));
        let valid = cells.iter().filter(|&&c| c != BAD_INDEX).count();
        assert_eq!(valid, 2);
    }

    #[test]
    fn test_adjacent_vertices_for_cell() {
        let grid = small_grid();
        let cell_idx = grid.point_to_index(0, 0, 0);
        let verts = grid.adjacent_vertices_for_cell(cell_idx);
        let expected = [
            (0, 0, 0),
            (0, 0, 1),
            (1, 0, 0),
            (1, 0, 1),
            (0, 1, 0),
            (0, 1, 1),
            (1, 1, 0),
            (1, 1, 1),
        ];
        for (i, &(x, y, z)) in expected.iter().enumerate() {
            assert_eq!(verts[i], grid.point_to_index(x, y, z));
        }
    }

    #[test]
    fn test_fill_planar_field() {
        // Solid below y = 0.25: every vertical edge from y=0 to y=1 crosses,
        // no horizontal edge does.
        let field = HalfSpaceField::new(DVec3::Y, 0.25, Material::Soil);
        let finder = BisectionZeroFinder::new(24);
        let mut grid = small_grid();
        grid.fill(&field, &finder);

        assert!(grid.edges(Axis::X).is_empty());
        assert!(grid.edges(Axis::Z).is_empty());

        // One Y crossing per (x, z) column, all at lower endpoint y = 0
        let dim = (grid.size() + 1) as usize;
        assert_eq!(grid.edges(Axis::Y).len(), dim * dim);
        for edge in grid.edges(Axis::Y) {
            assert_eq!(edge.lower.y, 0);
            assert!((0.0..1.0).contains(&edge.offset));
            assert!((edge.offset - 0.25).abs() < 1e-4);
            assert!(edge.solid_lower);
            assert_eq!(edge.material, Material::Soil);
            assert!((edge.gradient - DVec3::Y).length() < 1e-12);
        }

        // Materials follow the sign convention
        assert_eq!(grid.at(0, 0, 0), Material::Soil);
        assert_eq!(grid.at(0, 1, 0), Material::Empty);
    }

    #[test]
    fn test_exact_zero_is_inside() {
        // Plane exactly through the y = 0 lattice layer: zero samples are
        // solid, so the crossing sits on the edge above, not below.
        let field = HalfSpaceField::new(DVec3::Y, 0.0, Material::Stone);
        let finder = BisectionZeroFinder::new(24);
        let mut grid = small_grid();
        grid.fill(&field, &finder);

        assert_eq!(grid.at(0, 0, 0), Material::Stone);
        assert!(grid.edges(Axis::Y).find(IVec3::new(0, 0, 0)).is_some());
        assert!(grid.edges(Axis::Y).find(IVec3::new(0, -1, 0)).is_none());
    }

    #[test]
    fn test_refill_replaces_edges() {
        let finder = BisectionZeroFinder::default();
        let mut grid = small_grid();
        grid.fill(
            &HalfSpaceField::new(DVec3::Y, 0.25, Material::Stone),
            &finder,
        );
        let count_y = grid.edges(Axis::Y).len();
        assert!(count_y > 0);

        grid.fill(
            &HalfSpaceField::new(DVec3::X, 0.25, Material::Stone),
            &finder,
        );
        assert!(grid.edges(Axis::Y).is_empty());
        assert_eq!(grid.edges(Axis::X).len(), count_y);
    }

    #[test]
    fn test_cell_crossings_planar() {
        let field = HalfSpaceField::new(DVec3::Y, 0.25, Material::Stone);
        let finder = BisectionZeroFinder::new(24);
        let mut grid = small_grid();
        grid.fill(&field, &finder);

        // The cell [0,1)^3 is cut by the plane: its 4 vertical edges cross
        let planes = grid.cell_crossings(IVec3::new(0, 0, 0));
        assert_eq!(planes.len(), 4);
        for (point, normal) in planes {
            assert!((point.y - 0.25).abs() < 1e-4);
            assert!((normal - DVec3::Y).length() < 1e-12);
        }

        // A cell away from the surface has none
        assert!(grid.cell_crossings(IVec3::new(0, 1, 0)).is_empty());
    }
}
