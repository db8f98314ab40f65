//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Simulation tick counter (one tick is one in-game day)
pub type Tick = u64;

/// Unique identifier for citizens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CitizenId(pub u32);

/// Unique identifier for households (dvory)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DvorId(pub u32);

/// Unique identifier for placed buildings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// Unique identifier for political entities (politruks, agents, officers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Monotonic id allocator. Ids are never reused, so a stale id always
/// misses instead of aliasing a newer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_raw(&mut self) -> u32 {
        // `Default` starts at zero; keep zero unused either way
        if self.next == 0 {
            self.next = 1;
        }
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn citizen(&mut self) -> CitizenId {
        CitizenId(self.next_raw())
    }

    pub fn dvor(&mut self) -> DvorId {
        DvorId(self.next_raw())
    }

    pub fn building(&mut self) -> BuildingId {
        BuildingId(self.next_raw())
    }

    pub fn entity(&mut self) -> EntityId {
        EntityId(self.next_raw())
    }
}

/// Grid position of a building on the terrain map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Clamp a gauge value into the 0-100 range used by morale, loyalty, etc.
pub fn clamp_gauge(value: f32) -> f32 {
    value.clamp(0.0, 100.0)
}
