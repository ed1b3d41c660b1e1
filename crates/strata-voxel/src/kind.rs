//! Voxel kinds and the kind → display colour table.
//!
//! [`VoxelKind::Empty`] is tag 0 so that a zeroed voxel buffer represents
//! empty space, and every kind fits in a single byte on disk.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The closed set of voxel kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoxelKind {
    /// No content. Never collides, never drawn.
    #[default]
    Empty = 0,
    Stone = 1,
    Dirt = 2,
    Grass = 3,
    Sand = 4,
    Wood = 5,
    /// Bottom layer of generated terrain.
    Bedrock = 6,
}

impl VoxelKind {
    /// Every kind, in tag order.
    pub const ALL: [VoxelKind; 7] = [
        VoxelKind::Empty,
        VoxelKind::Stone,
        VoxelKind::Dirt,
        VoxelKind::Grass,
        VoxelKind::Sand,
        VoxelKind::Wood,
        VoxelKind::Bedrock,
    ];

    /// Returns the one-byte tag used for persistence.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decodes a persisted tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Returns `true` for every kind except [`VoxelKind::Empty`].
    pub fn is_solid(self) -> bool {
        self != VoxelKind::Empty
    }

    /// Lower-case name, as accepted by [`VoxelKind::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            VoxelKind::Empty => "empty",
            VoxelKind::Stone => "stone",
            VoxelKind::Dirt => "dirt",
            VoxelKind::Grass => "grass",
            VoxelKind::Sand => "sand",
            VoxelKind::Wood => "wood",
            VoxelKind::Bedrock => "bedrock",
        }
    }

    /// Parses a kind name. `"air"` is accepted as an alias for `Empty`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("air") {
            return Some(VoxelKind::Empty);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// One cell of the grid.
///
/// Holds only a kind today; the wrapper leaves room for per-voxel metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Voxel {
    kind: VoxelKind,
}

impl Voxel {
    /// The empty voxel.
    pub const EMPTY: Voxel = Voxel {
        kind: VoxelKind::Empty,
    };

    /// Creates a voxel of the given kind.
    pub const fn new(kind: VoxelKind) -> Self {
        Self { kind }
    }

    /// Returns the voxel's kind.
    pub fn kind(self) -> VoxelKind {
        self.kind
    }
}

impl From<VoxelKind> for Voxel {
    fn from(kind: VoxelKind) -> Self {
        Self::new(kind)
    }
}

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Scales the colour channels by `factor` (clamped to `[0, 1]`), keeping alpha.
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
            a: self.a,
        }
    }
}

/// Display colour for every [`VoxelKind`].
///
/// This is asset data handed in by the embedding application; the defaults
/// cover every kind so the table is always complete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorTable {
    colors: [Rgba; VoxelKind::ALL.len()],
}

impl ColorTable {
    /// Returns the colour for `kind`.
    pub fn color(&self, kind: VoxelKind) -> Rgba {
        self.colors[kind.tag() as usize]
    }

    /// Overrides the colour for `kind`.
    pub fn set_color(&mut self, kind: VoxelKind, color: Rgba) {
        self.colors[kind.tag() as usize] = color;
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            colors: [
                Rgba::TRANSPARENT,
                Rgba::opaque(128, 128, 128),
                Rgba::opaque(134, 96, 67),
                Rgba::opaque(95, 159, 53),
                Rgba::opaque(219, 211, 160),
                Rgba::opaque(102, 81, 51),
                Rgba::opaque(48, 48, 48),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
