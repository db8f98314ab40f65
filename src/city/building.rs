//! Building archetype with SoA layout
//!
//! Building lifecycle (construction animation, placement UI) belongs to the
//! presentation layer; the core only sees finished buildings that have been
//! placed or demolished through commands.

use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingId, CitizenId, GridPos, Tick};
use crate::economy::resources::ResourceKind;

/// Functional role of a building, used for job priority and tier rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingRole {
    Housing,
    Agriculture,
    Industry,
    Construction,
    Power,
    Administration,
    Medical,
    Education,
    Culture,
    Military,
}

impl BuildingRole {
    pub const ALL: [BuildingRole; 10] = [
        BuildingRole::Housing,
        BuildingRole::Agriculture,
        BuildingRole::Industry,
        BuildingRole::Construction,
        BuildingRole::Power,
        BuildingRole::Administration,
        BuildingRole::Medical,
        BuildingRole::Education,
        BuildingRole::Culture,
        BuildingRole::Military,
    ];
}

/// Type of building
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    Izba,
    Khrushchyovka,
    KolkhozFarm,
    Distillery,
    Sawmill,
    CementWorks,
    PrefabPlant,
    SteelMill,
    Factory,
    PowerStation,
    PartyOffice,
    Polyclinic,
    School,
    HouseOfCulture,
    Garrison,
}

impl BuildingType {
    pub fn role(&self) -> BuildingRole {
        match self {
            BuildingType::Izba | BuildingType::Khrushchyovka => BuildingRole::Housing,
            BuildingType::KolkhozFarm => BuildingRole::Agriculture,
            BuildingType::Distillery | BuildingType::SteelMill | BuildingType::Factory => {
                BuildingRole::Industry
            }
            BuildingType::Sawmill | BuildingType::CementWorks | BuildingType::PrefabPlant => {
                BuildingRole::Construction
            }
            BuildingType::PowerStation => BuildingRole::Power,
            BuildingType::PartyOffice => BuildingRole::Administration,
            BuildingType::Polyclinic => BuildingRole::Medical,
            BuildingType::School => BuildingRole::Education,
            BuildingType::HouseOfCulture => BuildingRole::Culture,
            BuildingType::Garrison => BuildingRole::Military,
        }
    }

    /// Job slots offered
    pub fn worker_capacity(&self) -> u32 {
        match self {
            BuildingType::Izba | BuildingType::Khrushchyovka => 0,
            BuildingType::KolkhozFarm => 10,
            BuildingType::Distillery => 6,
            BuildingType::Sawmill => 8,
            BuildingType::CementWorks => 8,
            BuildingType::PrefabPlant => 10,
            BuildingType::SteelMill => 12,
            BuildingType::Factory => 12,
            BuildingType::PowerStation => 6,
            BuildingType::PartyOffice => 4,
            BuildingType::Polyclinic => 4,
            BuildingType::School => 4,
            BuildingType::HouseOfCulture => 6,
            BuildingType::Garrison => 8,
        }
    }

    /// Residents housed
    pub fn housing_capacity(&self) -> u32 {
        match self {
            BuildingType::Izba => 6,
            BuildingType::Khrushchyovka => 40,
            _ => 0,
        }
    }

    /// Power drawn per tick while operating
    pub fn power_demand(&self) -> f64 {
        match self {
            BuildingType::Khrushchyovka => 5.0,
            BuildingType::Distillery => 2.0,
            BuildingType::CementWorks => 10.0,
            BuildingType::PrefabPlant => 15.0,
            BuildingType::SteelMill => 20.0,
            BuildingType::Factory => 10.0,
            BuildingType::PartyOffice => 2.0,
            BuildingType::Polyclinic => 3.0,
            BuildingType::School => 2.0,
            BuildingType::HouseOfCulture => 5.0,
            BuildingType::Garrison => 2.0,
            _ => 0.0,
        }
    }

    pub fn requires_power(&self) -> bool {
        self.power_demand() > 0.0
    }

    /// Power generated at full efficiency
    pub fn power_output(&self) -> f64 {
        match self {
            BuildingType::PowerStation => 60.0,
            _ => 0.0,
        }
    }

    pub fn is_agricultural(&self) -> bool {
        self.role() == BuildingRole::Agriculture
    }

    /// Materials required to place this building on plain ground
    pub fn required_materials(&self) -> Vec<(ResourceKind, f64)> {
        use ResourceKind::*;
        match self {
            BuildingType::Izba => vec![(Timber, 30.0)],
            BuildingType::Khrushchyovka => vec![(Prefab, 40.0), (Cement, 20.0)],
            BuildingType::KolkhozFarm => vec![(Timber, 40.0)],
            BuildingType::Distillery => vec![(Timber, 30.0), (Steel, 10.0)],
            BuildingType::Sawmill => vec![(Timber, 20.0), (Steel, 5.0)],
            BuildingType::CementWorks => vec![(Timber, 40.0), (Steel, 20.0)],
            BuildingType::PrefabPlant => vec![(Cement, 50.0), (Steel, 30.0)],
            BuildingType::SteelMill => vec![(Cement, 60.0), (Timber, 40.0)],
            BuildingType::Factory => vec![(Cement, 40.0), (Steel, 30.0)],
            BuildingType::PowerStation => vec![(Cement, 50.0), (Steel, 40.0)],
            BuildingType::PartyOffice => vec![(Timber, 40.0), (Cement, 20.0)],
            BuildingType::Polyclinic => vec![(Cement, 40.0), (Timber, 20.0)],
            BuildingType::School => vec![(Timber, 50.0)],
            BuildingType::HouseOfCulture => vec![(Cement, 60.0), (Prefab, 20.0)],
            BuildingType::Garrison => vec![(Timber, 40.0), (Cement, 20.0)],
        }
    }
}

/// Structure of Arrays for placed buildings, kept in id (placement) order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingArchetype {
    /// Unique identifiers
    pub ids: Vec<BuildingId>,
    /// Type of each building
    pub building_types: Vec<BuildingType>,
    /// Position on the terrain grid
    pub positions: Vec<GridPos>,
    /// Structural health (0-100)
    pub health: Vec<f32>,
    /// Citizens working here
    pub workers: Vec<Vec<CitizenId>>,
    /// Whether the grid supplied enough power this tick
    pub powered: Vec<bool>,
    /// Tick the building was placed
    pub placed_ticks: Vec<Tick>,
}

impl BuildingArchetype {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Place a finished building
    pub fn spawn(
        &mut self,
        id: BuildingId,
        building_type: BuildingType,
        position: GridPos,
        tick: Tick,
    ) -> usize {
        let index = self.ids.len();
        self.ids.push(id);
        self.building_types.push(building_type);
        self.positions.push(position);
        self.health.push(100.0);
        self.workers.push(Vec::new());
        self.powered.push(!building_type.requires_power());
        self.placed_ticks.push(tick);
        index
    }

    /// Remove a building, returning the workers it employed
    pub fn remove(&mut self, id: BuildingId) -> Option<Vec<CitizenId>> {
        let index = self.index_of(id)?;
        self.ids.remove(index);
        self.building_types.remove(index);
        self.positions.remove(index);
        self.health.remove(index);
        self.powered.remove(index);
        self.placed_ticks.remove(index);
        Some(self.workers.remove(index))
    }

    pub fn index_of(&self, id: BuildingId) -> Option<usize> {
        self.ids.iter().position(|&b| b == id)
    }

    pub fn is_occupied(&self, position: GridPos) -> bool {
        self.positions.contains(&position)
    }

    /// Drop a citizen from a building's worker list, returns false on a lookup miss
    pub fn release_worker(&mut self, building: BuildingId, citizen: CitizenId) -> bool {
        let Some(index) = self.index_of(building) else {
            return false;
        };
        let before = self.workers[index].len();
        self.workers[index].retain(|c| *c != citizen);
        self.workers[index].len() != before
    }

    pub fn worker_count(&self, index: usize) -> u32 {
        self.workers[index].len() as u32
    }

    /// Damage a building; health never drops below zero
    pub fn damage(&mut self, index: usize, amount: f32) {
        if let Some(h) = self.health.get_mut(index) {
            *h = (*h - amount).max(0.0);
        }
    }

    /// Iterate over buildings that offer jobs
    pub fn iter_workplaces(&self) -> impl Iterator<Item = usize> + '_ {
        self.building_types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.worker_capacity() > 0)
            .map(|(i, _)| i)
    }

    pub fn count_role(&self, role: BuildingRole) -> usize {
        self.building_types.iter().filter(|t| t.role() == role).count()
    }

    pub fn has_role(&self, role: BuildingRole) -> bool {
        self.building_types.iter().any(|t| t.role() == role)
    }

    /// Number of distinct roles present
    pub fn distinct_roles(&self) -> usize {
        BuildingRole::ALL.iter().filter(|r| self.has_role(**r)).count()
    }

    /// Share of job capacity that is non-agricultural, as a percentage
    pub fn non_agricultural_percent(&self) -> f32 {
        let total: u32 = self.building_types.iter().map(|t| t.worker_capacity()).sum();
        if total == 0 {
            return 0.0;
        }
        let non_ag: u32 = self
            .building_types
            .iter()
            .filter(|t| !t.is_agricultural())
            .map(|t| t.worker_capacity())
            .sum();
        non_ag as f32 * 100.0 / total as f32
    }

    pub fn housing_capacity(&self) -> u32 {
        self.building_types.iter().map(|t| t.housing_capacity()).sum()
    }

    pub fn average_health(&self) -> f32 {
        if self.health.is_empty() {
            return 100.0;
        }
        self.health.iter().sum::<f32>() / self.health.len() as f32
    }
}
