//! Read-only view for the presentation layer

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::calendar::GameDate;
use crate::core::types::{BuildingId, CitizenId, DvorId, Tick};
use crate::economy::doctrine::Doctrine;
use crate::economy::quota::Quota;
use crate::economy::resources::{ResourceKind, Shortage};
use crate::events::GameEvent;
use crate::political::ThreatLevel;
use crate::population::citizen::{Citizen, CitizenClass};
use crate::settlement::SettlementTier;
use crate::simulation::world::SimulationWorld;
use crate::workforce::focus::CollectiveFocus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitizenView {
    pub id: CitizenId,
    pub name: String,
    pub class: CitizenClass,
    pub age: u32,
    pub morale: f32,
    pub hunger: f32,
    pub dvor: DvorId,
    pub job: Option<BuildingId>,
}

impl From<&Citizen> for CitizenView {
    fn from(citizen: &Citizen) -> Self {
        Self {
            id: citizen.id,
            name: citizen.name.clone(),
            class: citizen.class,
            age: citizen.age,
            morale: citizen.morale,
            hunger: citizen.hunger,
            dvor: citizen.dvor,
            job: citizen.assignment.building(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: Tick,
    pub date: GameDate,
    pub doctrine: Doctrine,
    pub resources: BTreeMap<ResourceKind, f64>,
    /// Food earmarked as strategic reserve, included in `resources`
    pub strategic_reserve: f64,
    pub quota: Quota,
    pub threat: ThreatLevel,
    pub tier: SettlementTier,
    pub focus: CollectiveFocus,
    pub assigned: u32,
    /// Working-age citizens without a job
    pub idle: u32,
    pub citizens: Vec<CitizenView>,
    pub buildings: usize,
    pub political_entities: usize,
    /// Most recent first
    pub recent_events: Vec<GameEvent>,
    pub heating_failing: bool,
    pub shortages: Vec<Shortage>,
    pub score: f64,
    pub game_over: bool,
}

/// Events carried in a snapshot
pub const SNAPSHOT_EVENTS: usize = 10;

impl SimulationWorld {
    /// Capture the current state. Taking a snapshot never mutates the world.
    pub fn snapshot(&self) -> WorldSnapshot {
        let now = self.current_tick();
        let resources = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.store.get(kind)))
            .collect();
        let citizens: Vec<CitizenView> = self.registry.iter().map(CitizenView::from).collect();
        let assigned = citizens.iter().filter(|c| c.job.is_some()).count() as u32;
        let workforce = &self.config.workforce;
        let idle = self
            .registry
            .iter()
            .filter(|c| c.assignment.is_idle())
            .filter(|c| c.is_working_age(workforce.min_working_age, workforce.max_working_age))
            .count() as u32;

        WorldSnapshot {
            tick: now,
            date: self.calendar.date(),
            doctrine: self.economy.doctrine(),
            resources,
            strategic_reserve: self.economy.strategic_reserve(),
            quota: self.economy.quota().clone(),
            threat: self.political.threat(now),
            tier: self.settlement.tier(),
            focus: self.governor.focus(),
            assigned,
            idle,
            citizens,
            buildings: self.buildings.count(),
            political_entities: self.political.entities().len(),
            recent_events: self.events.history().recent().take(SNAPSHOT_EVENTS).cloned().collect(),
            heating_failing: self.economy.heating_failing(),
            shortages: self.store.shortages.clone(),
            score: self.score(),
            game_over: self.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::terrain::{TerrainGrid, TerrainKind};
    use crate::core::config::SimulationConfig;
    use crate::population::citizen::Gender;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_snapshot_counts_workers() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut world = SimulationWorld::new(
            SimulationConfig::default(),
            TerrainGrid::filled(10, 10, TerrainKind::Plains),
            &mut rng,
        )
        .unwrap();
        let report = world.tick(&mut rng).unwrap();
        let snapshot = world.snapshot();
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.assigned, report.governor.assigned);
        assert_eq!(snapshot.idle, report.governor.idle);
        assert!(snapshot.strategic_reserve <= snapshot.resources[&ResourceKind::Food]);
        assert_eq!(snapshot.citizens.len(), world.registry().len());
        assert_eq!(snapshot.resources.len(), ResourceKind::ALL.len());
        assert_eq!(snapshot, world.snapshot());
    }

    #[test]
    fn test_children_and_elders_are_not_idle_workers() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut world = SimulationWorld::new(
            SimulationConfig::default(),
            TerrainGrid::filled(10, 10, TerrainKind::Plains),
            &mut rng,
        )
        .unwrap();
        let dvor = world.registry.add_household("Dvor Orlov".into(), 50.0);
        world
            .registry
            .spawn(dvor, "Child".into(), CitizenClass::Farmer, 4, Gender::Male);
        world
            .registry
            .spawn(dvor, "Elder".into(), CitizenClass::Farmer, 75, Gender::Female);
        let report = world.tick(&mut rng).unwrap();
        let snapshot = world.snapshot();
        assert_eq!(snapshot.idle, report.governor.idle);
        assert!(snapshot.assigned + snapshot.idle < world.registry().len() as u32);
    }
}
