//! JSON save files
//!
//! A save holds every piece of state that survives between ticks, including
//! the tier hysteresis counters. The recipe catalog is rebuilt from defaults
//! and the last tick report is dropped. The RNG is owned by the caller and is
//! not part of a save.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::city::building::BuildingArchetype;
use crate::city::recipe::RecipeCatalog;
use crate::city::terrain::TerrainGrid;
use crate::core::calendar::Calendar;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::IdAllocator;
use crate::economy::resources::ResourceStore;
use crate::economy::EconomySystem;
use crate::events::EventSystem;
use crate::political::PoliticalSystem;
use crate::population::registry::CitizenRegistry;
use crate::scoring::ScoringSystem;
use crate::settlement::SettlementSystem;
use crate::simulation::command::SimCommand;
use crate::simulation::world::SimulationWorld;
use crate::workforce::governor::WorkerGovernor;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub version: u32,
    pub config: SimulationConfig,
    pub calendar: Calendar,
    pub terrain: TerrainGrid,
    pub store: ResourceStore,
    pub registry: CitizenRegistry,
    pub buildings: BuildingArchetype,
    pub building_ids: IdAllocator,
    pub governor: WorkerGovernor,
    pub economy: EconomySystem,
    pub settlement: SettlementSystem,
    pub political: PoliticalSystem,
    pub events: EventSystem,
    pub scoring: ScoringSystem,
    pub pending: Vec<SimCommand>,
    pub game_over: bool,
}

impl SaveState {
    pub fn capture(world: &SimulationWorld) -> Self {
        Self {
            version: SAVE_VERSION,
            config: world.config.clone(),
            calendar: world.calendar.clone(),
            terrain: world.terrain.clone(),
            store: world.store.clone(),
            registry: world.registry.clone(),
            buildings: world.buildings.clone(),
            building_ids: world.building_ids.clone(),
            governor: world.governor,
            economy: world.economy.clone(),
            settlement: world.settlement.clone(),
            political: world.political.clone(),
            events: world.events.clone(),
            scoring: world.scoring.clone(),
            pending: world.pending.clone(),
            game_over: world.game_over,
        }
    }

    /// Rebuild a world. Refuses unknown versions and invalid configs.
    pub fn restore(self) -> Result<SimulationWorld> {
        if self.version != SAVE_VERSION {
            return Err(SimError::InvalidConfiguration(format!(
                "unsupported save version {}",
                self.version
            )));
        }
        self.config.validate()?;
        self.store.verify()?;
        Ok(SimulationWorld {
            config: self.config,
            calendar: self.calendar,
            terrain: self.terrain,
            recipes: RecipeCatalog::with_defaults(),
            store: self.store,
            registry: self.registry,
            buildings: self.buildings,
            building_ids: self.building_ids,
            governor: self.governor,
            economy: self.economy,
            settlement: self.settlement,
            political: self.political,
            events: self.events,
            scoring: self.scoring,
            pending: self.pending,
            last_report: None,
            game_over: self.game_over,
        })
    }
}

pub fn save_to_json(world: &SimulationWorld) -> Result<String> {
    Ok(serde_json::to_string(&SaveState::capture(world))?)
}

pub fn load_from_json(json: &str) -> Result<SimulationWorld> {
    let state: SaveState = serde_json::from_str(json)?;
    state.restore()
}

pub fn save_to_file(world: &SimulationWorld, path: &Path) -> Result<()> {
    fs::write(path, save_to_json(world)?)?;
    info!(path = %path.display(), tick = world.current_tick(), "game saved");
    Ok(())
}

pub fn load_from_file(path: &Path) -> Result<SimulationWorld> {
    let json = fs::read_to_string(path)?;
    let world = load_from_json(&json)?;
    info!(path = %path.display(), tick = world.current_tick(), "game loaded");
    Ok(world)
}
