//! Terrain lookups
//!
//! Map generation is an external concern. The core only consumes a grid of
//! terrain cells to answer "can we build here" and "how hard is it to work
//! this ground".

use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Plains,
    Forest,
    Marsh,
    Water,
    Mountain,
}

impl TerrainKind {
    pub fn is_buildable(&self) -> bool {
        matches!(self, TerrainKind::Plains | TerrainKind::Forest | TerrainKind::Marsh)
    }

    /// Relative cost of moving across (and clearing) this ground
    pub fn movement_cost(&self) -> f64 {
        match self {
            TerrainKind::Plains => 1.0,
            TerrainKind::Forest => 1.5,
            TerrainKind::Marsh => 2.0,
            TerrainKind::Water => 3.0,
            TerrainKind::Mountain => 4.0,
        }
    }
}

/// Row-major grid of terrain cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<TerrainKind>,
}

impl TerrainGrid {
    /// Uniform grid of one terrain kind
    pub fn filled(width: u32, height: u32, kind: TerrainKind) -> Self {
        Self {
            width,
            height,
            cells: vec![kind; (width * height) as usize],
        }
    }

    /// Wrap externally generated cells; returns None when the size is wrong
    pub fn from_cells(width: u32, height: u32, cells: Vec<TerrainKind>) -> Option<Self> {
        if cells.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, pos: GridPos) -> Option<TerrainKind> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        self.cells.get((pos.y * self.width + pos.x) as usize).copied()
    }

    pub fn is_buildable(&self, pos: GridPos) -> bool {
        self.get(pos).map(|t| t.is_buildable()).unwrap_or(false)
    }

    /// Movement cost at a cell; off-map cells are impassable
    pub fn movement_cost(&self, pos: GridPos) -> Option<f64> {
        self.get(pos).map(|t| t.movement_cost())
    }
}

impl Default for TerrainGrid {
    fn default() -> Self {
        Self::filled(32, 32, TerrainKind::Plains)
    }
}
