//! Per-axis storage of surface-crossing edges

use glam::{DVec3, IVec3};

use crate::material::Material;
use crate::types::Axis;

/// One surface-crossing lattice edge
///
/// Keyed by the lattice coordinates of the edge endpoint with the smaller
/// coordinate along the owning axis. Records where the zero crossing sits on
/// the edge and how the surface is oriented there.
#[derive(Debug, Clone, Copy)]
pub struct GridEdge {
    /// Lattice coordinates of the lower edge endpoint
    pub lower: IVec3,
    /// Fractional position of the crossing along the edge, in `[0, 1)`
    pub offset: f64,
    /// Raw field gradient at the crossing (not normalized)
    pub gradient: DVec3,
    /// Whether the lower endpoint is the solid side of the edge
    pub solid_lower: bool,
    /// Material carried across the crossing (of the solid endpoint)
    pub material: Material,
}

impl GridEdge {
    /// Crossing position in grid-local lattice coordinates
    #[inline]
    pub fn surface_local(&self, axis: Axis) -> DVec3 {
        self.lower.as_dvec3() + self.offset * axis.unit_dvec3()
    }
}

/// Crossing edges of one principal axis
///
/// Filled by [`UniformGrid::fill`](crate::grid::UniformGrid::fill) in lattice
/// scan order, which is lexicographic by `(y, x, z)`; [`EdgeStorage::find`]
/// relies on that ordering for binary lookup.
#[derive(Debug, Clone)]
pub struct EdgeStorage {
    axis: Axis,
    edges: Vec<GridEdge>,
}

impl EdgeStorage {
    /// Create an empty storage for edges along `axis`
    pub fn new(axis: Axis) -> Self {
        EdgeStorage {
            axis,
            edges: Vec::new(),
        }
    }

    /// The axis all stored edges run along
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of stored crossing edges
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no crossing edges are stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Remove all stored edges
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Append a crossing edge; `fill()` appends in `(y, x, z)` scan order
    pub(crate) fn add_edge(
        &mut self,
        lower: IVec3,
        offset: f64,
        gradient: DVec3,
        solid_lower: bool,
        material: Material,
    ) {
        debug_assert!((0.0..1.0).contains(&offset));
        self.edges.push(GridEdge {
            lower,
            offset,
            gradient,
            solid_lower,
            material,
        });
    }

    /// Iterate over stored edges in `(y, x, z)` order
    pub fn iter(&self) -> impl Iterator<Item = &GridEdge> {
        self.edges.iter()
    }

    /// Binary lookup of the edge with the given lower endpoint
    pub fn find(&self, lower: IVec3) -> Option<&GridEdge> {
        self.edges
            .binary_search_by_key(&(lower.y, lower.x, lower.z), |e| {
                (e.lower.y, e.lower.x, e.lower.z)
            })
            .ok()
            .map(|i| &self.edges[i])
    }
}

impl<'a> IntoIterator for &'a EdgeStorage {
    type Item = &'a GridEdge;
    type IntoIter = std::slice::Iter<'a, GridEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
