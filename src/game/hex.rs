//! Hexagonal coordinate system using offset coordinates (odd-r).
//!
//! Based on Red Blob Games' excellent guide:
//! https://www.redblobgames.com/grids/hexagons/
//!
//! We use "pointy-top" orientation with "odd-r" offset coordinates, so odd rows
//! are shifted right by half a cell. Three addressing schemes show up:
//! - [`GridPos`] `(col, row)`: offset coordinates used to index the board.
//! - [`AxialCoord`] `(q, r)`: the hex-native address.
//! - [`CubeCoord`] `(x, y, z)` with `x + y + z = 0`, used to round a fractional
//!   position to the nearest hex.
//!
//! Local space has row 0 at the top and `y` decreasing as rows go down.

use bevy::prelude::*;

/// Square root of 3, used frequently in hex math.
pub const SQRT_3: f32 = 1.732_050_8;

// Neighbor offsets as (dcol, drow). Odd rows are shifted right, so the
// diagonal neighbors differ between even and odd rows.
const EVEN_ROW_NEIGHBORS: [(i32, i32); 6] = [(-1, 0), (-1, -1), (0, -1), (1, 0), (0, 1), (-1, 1)];
const ODD_ROW_NEIGHBORS: [(i32, i32); 6] = [(-1, 0), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1)];

/// Offset hex coordinate (odd-r system).
///
/// - `col` increases to the right
/// - `row` increases downward, row 0 is the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[inline]
    pub const fn is_odd_row(&self) -> bool {
        self.row & 1 == 1
    }

    /// Get all 6 neighboring positions, using the offset table for this row's parity.
    pub fn neighbors(&self) -> [GridPos; 6] {
        let offsets = if self.is_odd_row() {
            ODD_ROW_NEIGHBORS
        } else {
            EVEN_ROW_NEIGHBORS
        };
        offsets.map(|(dc, dr)| GridPos::new(self.col + dc, self.row + dr))
    }

    pub fn to_axial(self) -> AxialCoord {
        AxialCoord {
            q: self.col - (self.row - (self.row & 1)) / 2,
            r: self.row,
        }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Axial hex coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    /// Convert to odd-r offset coordinates.
    pub fn to_grid(self) -> GridPos {
        GridPos::new(self.q + (self.r - (self.r & 1)) / 2, self.r)
    }
}

/// Cube coordinate. Fractional until [`CubeCoord::round`] snaps it to a hex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeCoord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CubeCoord {
    /// Lift a (possibly fractional) axial position into cube space.
    pub fn from_axial(q: f32, r: f32) -> Self {
        Self { x: q, y: -q - r, z: r }
    }

    /// Round to the nearest hex.
    ///
    /// Each axis is rounded on its own, then the axis that moved the most is
    /// recomputed from the other two so that `x + y + z == 0` still holds.
    pub fn round(self) -> Self {
        let mut rx = self.x.round();
        let mut ry = self.y.round();
        let mut rz = self.z.round();

        let x_diff = (rx - self.x).abs();
        let y_diff = (ry - self.y).abs();
        let z_diff = (rz - self.z).abs();

        if x_diff > y_diff && x_diff > z_diff {
            rx = -ry - rz;
        } else if y_diff > z_diff {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        Self {
            x: rx,
            y: ry,
            z: rz,
        }
    }

    /// Drop the redundant axis. Only meaningful after [`CubeCoord::round`].
    pub fn to_axial(self) -> AxialCoord {
        AxialCoord {
            q: self.x as i32,
            r: self.z as i32,
        }
    }
}

/// Maps between grid cells and continuous board-local positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    /// Radius of a bubble.
    pub bubble_radius: f32,
    /// Center-to-vertex distance of the hexagon a bubble is inscribed in.
    pub hexagon_size: f32,
}

impl HexLayout {
    pub fn new(bubble_radius: f32) -> Self {
        Self {
            bubble_radius,
            hexagon_size: bubble_radius / 30.0_f32.to_radians().cos(),
        }
    }

    /// Vertical distance between the centers of two adjacent rows.
    pub fn row_spacing(&self) -> f32 {
        self.hexagon_size * 1.5
    }

    /// Center of a grid cell in local space.
    pub fn grid_to_local(&self, pos: GridPos) -> Vec2 {
        let row_offset = if pos.is_odd_row() { 0.5 } else { 0.0 };
        let x = self.hexagon_size * SQRT_3 * (pos.col as f32 + row_offset);
        let y = self.row_spacing() * pos.row as f32;
        Vec2::new(x + self.bubble_radius, -y - self.hexagon_size)
    }

    /// Nearest hex to a local position, in cube coordinates.
    pub fn local_to_cube(&self, local: Vec2) -> CubeCoord {
        let x = local.x - self.bubble_radius;
        let y = -local.y - self.hexagon_size;

        let q = (x * SQRT_3 / 3.0 - y / 3.0) / self.hexagon_size;
        let r = y * 2.0 / 3.0 / self.hexagon_size;

        CubeCoord::from_axial(q, r).round()
    }

    /// The grid cell containing a local position.
    pub fn local_to_grid(&self, local: Vec2) -> GridPos {
        self.local_to_cube(local).to_axial().to_grid()
    }
}
