//! KGB investigations
//!
//! An investigation watches one building. Every tick each worker there may
//! be flagged; disloyal households are flagged more readily. When the
//! investigation runs out, its flagged workers turn into black marks on the
//! chairman's file, and a purge also takes them away.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::city::building::BuildingArchetype;
use crate::core::types::{BuildingId, CitizenId, EntityId};
use crate::political::personnel::ThreatLevel;
use crate::population::registry::CitizenRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Routine,
    Thorough,
    Purge,
}

impl Intensity {
    pub fn for_threat(threat: ThreatLevel) -> Self {
        match threat {
            ThreatLevel::Safe | ThreatLevel::Watched | ThreatLevel::Warned => Intensity::Routine,
            ThreatLevel::Investigated => Intensity::Thorough,
            ThreatLevel::Reviewed | ThreatLevel::Arrested => Intensity::Purge,
        }
    }

    pub fn duration(&self) -> u32 {
        match self {
            Intensity::Routine => 30,
            Intensity::Thorough => 60,
            Intensity::Purge => 90,
        }
    }

    /// Per worker per tick, before the loyalty factor
    pub fn flag_chance(&self) -> f32 {
        match self {
            Intensity::Routine => 0.01,
            Intensity::Thorough => 0.02,
            Intensity::Purge => 0.04,
        }
    }

    pub fn marks_per_flag(&self) -> f64 {
        match self {
            Intensity::Routine => 0.2,
            Intensity::Thorough => 0.35,
            Intensity::Purge => 0.5,
        }
    }

    pub fn arrests_flagged(&self) -> bool {
        matches!(self, Intensity::Purge)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intensity::Routine => "routine",
            Intensity::Thorough => "thorough",
            Intensity::Purge => "purge",
        }
    }
}

/// Scale flag chance by household loyalty: 1.5 at 0 loyalty, 0.5 at 100
pub fn loyalty_factor(loyalty: f32) -> f32 {
    1.5 - loyalty.clamp(0.0, 100.0) / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KgbInvestigation {
    pub id: u32,
    pub target_building: BuildingId,
    pub intensity: Intensity,
    pub ticks_remaining: u32,
    pub flagged: Vec<CitizenId>,
    pub agent: EntityId,
}

impl KgbInvestigation {
    pub fn flagged_count(&self) -> usize {
        self.flagged.len()
    }
}

/// A finished investigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationResult {
    pub id: u32,
    pub target_building: BuildingId,
    pub intensity: Intensity,
    pub flagged: Vec<CitizenId>,
    pub agent: EntityId,
    pub marks: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KgbService {
    investigations: Vec<KgbInvestigation>,
    next_id: u32,
}

impl KgbService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn investigations(&self) -> &[KgbInvestigation] {
        &self.investigations
    }

    /// Roll for a new investigation. `pressure` is the politburo multiplier.
    #[allow(clippy::too_many_arguments)]
    pub fn maybe_open<R: Rng + ?Sized>(
        &mut self,
        threat: ThreatLevel,
        watch_threshold: u8,
        base_chance: f32,
        pressure: f32,
        max_concurrent: usize,
        buildings: &BuildingArchetype,
        agent: EntityId,
        rng: &mut R,
    ) -> Option<&KgbInvestigation> {
        if threat.ordinal() < watch_threshold || self.investigations.len() >= max_concurrent {
            return None;
        }
        let chance = base_chance * threat.ordinal() as f32 * pressure;
        if rng.gen::<f32>() >= chance {
            return None;
        }
        let staffed: Vec<BuildingId> = buildings
            .iter_workplaces()
            .filter(|i| !buildings.workers[*i].is_empty())
            .map(|i| buildings.ids[i])
            .collect();
        let target = *staffed.choose(rng)?;

        let intensity = Intensity::for_threat(threat);
        self.next_id += 1;
        info!(
            id = self.next_id,
            building = target.0,
            intensity = intensity.name(),
            "kgb investigation opened"
        );
        self.investigations.push(KgbInvestigation {
            id: self.next_id,
            target_building: target,
            intensity,
            ticks_remaining: intensity.duration(),
            flagged: Vec::new(),
            agent,
        });
        self.investigations.last()
    }

    /// Advance every investigation by one tick.
    ///
    /// Returns the citizens flagged this tick and the investigations that
    /// concluded. Investigations whose building is gone conclude at once.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        buildings: &BuildingArchetype,
        registry: &CitizenRegistry,
        rng: &mut R,
    ) -> (Vec<CitizenId>, Vec<InvestigationResult>) {
        let mut flagged_now = Vec::new();

        for inv in &mut self.investigations {
            let Some(index) = buildings.index_of(inv.target_building) else {
                inv.ticks_remaining = 0;
                continue;
            };
            for worker in &buildings.workers[index] {
                if inv.flagged.contains(worker) {
                    continue;
                }
                let Some(citizen) = registry.get(*worker) else {
                    continue;
                };
                let loyalty = registry
                    .household(citizen.dvor)
                    .map(|d| d.loyalty_to_collective)
                    .unwrap_or(50.0);
                let chance = inv.intensity.flag_chance() * loyalty_factor(loyalty);
                if rng.gen::<f32>() < chance {
                    inv.flagged.push(*worker);
                    flagged_now.push(*worker);
                }
            }
            inv.ticks_remaining = inv.ticks_remaining.saturating_sub(1);
        }

        let mut concluded = Vec::new();
        let mut remaining = Vec::with_capacity(self.investigations.len());
        for inv in self.investigations.drain(..) {
            if inv.ticks_remaining == 0 {
                let marks = inv.flagged.len() as f64 * inv.intensity.marks_per_flag();
                info!(
                    id = inv.id,
                    flagged = inv.flagged.len(),
                    marks,
                    "kgb investigation concluded"
                );
                concluded.push(InvestigationResult {
                    id: inv.id,
                    target_building: inv.target_building,
                    intensity: inv.intensity,
                    flagged: inv.flagged,
                    agent: inv.agent,
                    marks,
                });
            } else {
                remaining.push(inv);
            }
        }
        self.investigations = remaining;

        (flagged_now, concluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::BuildingType;
    use crate::core::types::GridPos;
    use crate::population::citizen::{CitizenClass, Gender};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn staffed_factory(workers: u32, loyalty: f32) -> (BuildingArchetype, CitizenRegistry) {
        let mut registry = CitizenRegistry::new();
        let dvor = registry.add_household("Dvor Orlov".into(), loyalty);
        let mut buildings = BuildingArchetype::new();
        buildings.spawn(BuildingId(1), BuildingType::Factory, GridPos::new(0, 0), 0);
        for i in 0..workers {
            let id = registry
                .spawn(dvor, format!("Worker {}", i), CitizenClass::Worker, 30, Gender::Male)
                .unwrap();
            buildings.workers[0].push(id);
        }
        (buildings, registry)
    }

    #[test]
    fn test_intensity_table() {
        assert_eq!(Intensity::for_threat(ThreatLevel::Watched), Intensity::Routine);
        assert_eq!(Intensity::for_threat(ThreatLevel::Investigated), Intensity::Thorough);
        assert_eq!(Intensity::for_threat(ThreatLevel::Reviewed), Intensity::Purge);
        assert_eq!(Intensity::Purge.duration(), 90);
        assert!(Intensity::Purge.arrests_flagged());
    }

    #[test]
    fn test_no_investigation_below_threshold() {
        let (buildings, _) = staffed_factory(5, 50.0);
        let mut kgb = KgbService::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(kgb
                .maybe_open(ThreatLevel::Safe, 1, 1.0, 1.0, 2, &buildings, EntityId(1), &mut rng)
                .is_none());
        }
    }

    #[test]
    fn test_concurrency_cap() {
        let (buildings, _) = staffed_factory(5, 50.0);
        let mut kgb = KgbService::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for i in 0..10 {
            kgb.maybe_open(ThreatLevel::Reviewed, 1, 1.0, 1.0, 2, &buildings, EntityId(i), &mut rng);
        }
        assert_eq!(kgb.investigations().len(), 2);
        assert_eq!(kgb.investigations()[0].intensity, Intensity::Purge);
    }

    #[test]
    fn test_investigation_concludes_with_marks() {
        let (buildings, registry) = staffed_factory(12, 0.0);
        let mut kgb = KgbService::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        // certain to open: chance = 1.0 * 1 * 1.0
        kgb.maybe_open(ThreatLevel::Watched, 1, 1.0, 1.0, 2, &buildings, EntityId(9), &mut rng)
            .unwrap();

        let mut total_flagged = 0;
        let mut results = Vec::new();
        for _ in 0..30 {
            let (flagged, concluded) = kgb.tick(&buildings, &registry, &mut rng);
            total_flagged += flagged.len();
            results.extend(concluded);
        }
        assert_eq!(results.len(), 1);
        assert!(kgb.investigations().is_empty());
        assert_eq!(results[0].flagged.len(), total_flagged);
        assert!((results[0].marks - total_flagged as f64 * 0.2).abs() < 1e-9);
        assert_eq!(results[0].agent, EntityId(9));
    }

    #[test]
    fn test_demolished_target_concludes() {
        let (mut buildings, registry) = staffed_factory(3, 50.0);
        let mut kgb = KgbService::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        kgb.maybe_open(ThreatLevel::Watched, 1, 1.0, 1.0, 2, &buildings, EntityId(2), &mut rng)
            .unwrap();
        buildings.remove(BuildingId(1));
        let (_, concluded) = kgb.tick(&buildings, &registry, &mut rng);
        assert_eq!(concluded.len(), 1);
    }

    #[test]
    fn test_loyalty_factor() {
        assert_eq!(loyalty_factor(0.0), 1.5);
        assert_eq!(loyalty_factor(100.0), 0.5);
    }
}
