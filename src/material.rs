//! Voxel materials

use serde::{Deserialize, Serialize};

/// Voxel material stored at each lattice vertex
///
/// Only equality and emptiness are meaningful; there is no ordering between
/// materials. `Empty` means air (scalar field value above zero).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Material {
    /// No voxel (i.e. air)
    #[default]
    Empty = 0,
    /// Stone
    Stone,
    /// Soil
    Soil,
}

impl Material {
    /// Whether this material is air
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Material::Empty
    }
}
