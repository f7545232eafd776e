//! Small shared types for lattice addressing

use glam::{DVec3, IVec3};

/// Principal lattice axis
///
/// Edge and face queries on [`UniformGrid`](crate::grid::UniformGrid) are
/// parameterized by the axis the edge runs along (or the face normal points
/// along).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// All three axes, in X, Y, Z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (X = 0, Y = 1, Z = 2)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis
    #[inline]
    pub fn unit_dvec3(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }

    /// Integer unit vector along this axis
    #[inline]
    pub fn unit_ivec3(self) -> IVec3 {
        match self {
            Axis::X => IVec3::X,
            Axis::Y => IVec3::Y,
            Axis::Z => IVec3::Z,
        }
    }

    /// The component of `v` along this axis
    #[inline]
    pub fn component(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// `v` with its component along this axis replaced by `value`
    #[inline]
    pub fn with_component(self, v: DVec3, value: f64) -> DVec3 {
        match self {
            Axis::X => DVec3::new(value, v.y, v.z),
            Axis::Y => DVec3::new(v.x, value, v.z),
            Axis::Z => DVec3::new(v.x, v.y, value),
        }
    }

    /// The two remaining axes, in X, Y, Z order
    #[inline]
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_round_trip() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        for axis in Axis::ALL {
            let w = axis.with_component(v, 9.0);
            assert_eq!(axis.component(w), 9.0);
            let (u, t) = axis.others();
            assert_eq!(u.component(w), u.component(v));
            assert_eq!(t.component(w), t.component(v));
        }
    }
}
