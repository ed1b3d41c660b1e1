//! The six axis-aligned faces of a voxel.

use glam::{IVec3, Vec3};

/// Direction a voxel face points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    /// Top.
    PosY = 2,
    /// Bottom.
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    /// All six faces in emission order.
    pub const ALL: [Face; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Offset to the face-adjacent cell.
    pub fn offset(self) -> IVec3 {
        match self {
            Self::PosX => IVec3::X,
            Self::NegX => IVec3::NEG_X,
            Self::PosY => IVec3::Y,
            Self::NegY => IVec3::NEG_Y,
            Self::PosZ => IVec3::Z,
            Self::NegZ => IVec3::NEG_Z,
        }
    }

    /// Outward unit normal.
    pub fn normal(self) -> Vec3 {
        self.offset().as_vec3()
    }

    pub fn is_top(self) -> bool {
        self == Self::PosY
    }

    pub fn is_bottom(self) -> bool {
        self == Self::NegY
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_unit_and_distinct() {
        let mut sum = IVec3::ZERO;
        for (i, a) in Face::ALL.iter().enumerate() {
            assert_eq!(a.offset().abs().element_sum(), 1);
            sum += a.offset();
            for b in &Face::ALL[i + 1..] {
                assert_ne!(a.offset(), b.offset());
            }
        }
        assert_eq!(sum, IVec3::ZERO);
    }
}
