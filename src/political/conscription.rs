//! Military conscription
//!
//! Draft waves are gated by the doctrine's interval. Drafted citizens leave
//! the registry; survivors of a peacetime draft are held here and readmitted
//! as soldiers when their service ends.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::city::building::BuildingArchetype;
use crate::core::types::{CitizenId, Tick};
use crate::economy::doctrine::ConscriptionPolicy;
use crate::population::citizen::{Citizen, CitizenClass, Gender};
use crate::population::registry::CitizenRegistry;

pub const MIN_DRAFT_AGE: u32 = 18;
pub const MAX_DRAFT_AGE: u32 = 45;
/// Length of peacetime service
pub const SERVICE_TICKS: u64 = 720;
/// `return_tick` value of a draft that never returns
pub const PERMANENT: i64 = -1;

const OFFICER_NAMES: &[&str] = &[
    "Major Zhukov",
    "Captain Rokossovsky",
    "Colonel Konev",
    "Major Vatutin",
    "Captain Chuikov",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConscriptionEvent {
    pub officer_name: String,
    pub tick: Tick,
    pub target_count: u32,
    pub drafted: u32,
    pub casualties: u32,
    pub return_tick: i64,
    pub held: Vec<Citizen>,
}

impl ConscriptionEvent {
    pub fn is_permanent(&self) -> bool {
        self.return_tick == PERMANENT
    }

    fn is_due(&self, now: Tick) -> bool {
        self.return_tick >= 0 && now as i64 >= self.return_tick
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConscriptionService {
    /// Drafts whose survivors are still in service
    active: Vec<ConscriptionEvent>,
    last_draft: Tick,
    total_drafted: u32,
    total_casualties: u32,
}

impl ConscriptionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[ConscriptionEvent] {
        &self.active
    }

    pub fn total_drafted(&self) -> u32 {
        self.total_drafted
    }

    pub fn total_casualties(&self) -> u32 {
        self.total_casualties
    }

    /// Citizens currently away on service
    pub fn in_service(&self) -> usize {
        self.active.iter().map(|e| e.held.len()).sum()
    }

    pub fn is_due(&self, now: Tick, policy: &ConscriptionPolicy) -> bool {
        now >= self.last_draft + policy.interval.max(1)
    }

    /// Run a draft wave if one is due.
    ///
    /// `exclude` lists citizens flagged by the KGB this tick; they are never
    /// drafted in the same tick.
    pub fn maybe_draft<R: Rng + ?Sized>(
        &mut self,
        now: Tick,
        policy: &ConscriptionPolicy,
        registry: &mut CitizenRegistry,
        buildings: &mut BuildingArchetype,
        exclude: &[CitizenId],
        rng: &mut R,
    ) -> Option<&ConscriptionEvent> {
        if !self.is_due(now, policy) {
            return None;
        }
        self.last_draft = now;

        let eligible: Vec<CitizenId> = registry
            .iter()
            .filter(|c| c.gender == Gender::Male)
            .filter(|c| (MIN_DRAFT_AGE..=MAX_DRAFT_AGE).contains(&c.age))
            .filter(|c| !exclude.contains(&c.id))
            .map(|c| c.id)
            .collect();
        if eligible.is_empty() {
            debug!(tick = now, "draft due but nobody eligible");
            return None;
        }

        let target = (policy.rate * eligible.len() as f32).ceil() as usize;
        let chosen: Vec<CitizenId> = eligible.choose_multiple(rng, target).copied().collect();

        let mut held = Vec::new();
        let mut casualties = 0;
        for id in &chosen {
            let Some(citizen) = registry.remove(*id) else {
                continue;
            };
            if let Some(building) = citizen.assignment.building() {
                buildings.release_worker(building, *id);
            }
            if rng.gen::<f32>() < policy.casualty_rate {
                casualties += 1;
            } else if !policy.permanent {
                held.push(citizen);
            }
        }

        let officer_name = OFFICER_NAMES
            .choose(rng)
            .copied()
            .unwrap_or("Major Zhukov")
            .to_string();
        let drafted = chosen.len() as u32;
        self.total_drafted += drafted;
        self.total_casualties += casualties;

        let event = ConscriptionEvent {
            officer_name,
            tick: now,
            target_count: target as u32,
            drafted,
            casualties,
            return_tick: if policy.permanent {
                PERMANENT
            } else {
                (now + SERVICE_TICKS) as i64
            },
            held,
        };
        info!(
            officer = %event.officer_name,
            drafted,
            casualties,
            permanent = policy.permanent,
            "conscription wave"
        );
        self.active.push(event);
        self.active.last()
    }

    /// Readmit survivors whose service has ended; returns how many came home
    pub fn process_returns(&mut self, now: Tick, registry: &mut CitizenRegistry) -> usize {
        let mut returned = 0;
        let (due, pending): (Vec<_>, Vec<_>) = self.active.drain(..).partition(|e| e.is_due(now));
        self.active = pending.into_iter().filter(|e| !e.is_permanent()).collect();
        for event in due {
            for mut citizen in event.held {
                citizen.age += ((now - event.tick) / 360) as u32;
                citizen.class = CitizenClass::Soldier;
                registry.readmit(citizen);
                returned += 1;
            }
        }
        if returned > 0 {
            info!(returned, tick = now, "conscripts returned");
        }
        returned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::BuildingType;
    use crate::core::types::{BuildingId, GridPos};
    use crate::economy::doctrine::Doctrine;
    use crate::population::citizen::{Assignment, CitizenClass};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn village(men: u32, women: u32) -> CitizenRegistry {
        let mut registry = CitizenRegistry::new();
        let dvor = registry.add_household("Dvor Volkov".into(), 60.0);
        for i in 0..men {
            registry.spawn(dvor, format!("Man {}", i), CitizenClass::Worker, 25, Gender::Male);
        }
        for i in 0..women {
            registry.spawn(dvor, format!("Woman {}", i), CitizenClass::Worker, 25, Gender::Female);
        }
        registry
    }

    #[test]
    fn test_not_due_before_interval() {
        let service = ConscriptionService::new();
        let policy = Doctrine::Wartime.conscription();
        assert!(!service.is_due(89, &policy));
        assert!(service.is_due(90, &policy));
    }

    #[test]
    fn test_wartime_draft_is_permanent() {
        let mut registry = village(20, 10);
        let mut buildings = BuildingArchetype::new();
        let mut service = ConscriptionService::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let policy = Doctrine::Wartime.conscription();

        let event = service
            .maybe_draft(90, &policy, &mut registry, &mut buildings, &[], &mut rng)
            .unwrap();
        // ceil(0.10 * 20)
        assert_eq!(event.target_count, 2);
        assert_eq!(event.drafted, 2);
        assert!(event.is_permanent());
        assert!(event.held.is_empty());
        assert_eq!(registry.len(), 28);

        assert_eq!(service.process_returns(10_000, &mut registry), 0);
        assert!(service.active().is_empty());
    }

    #[test]
    fn test_peacetime_conscripts_return() {
        let mut registry = village(40, 0);
        let mut buildings = BuildingArchetype::new();
        let mut service = ConscriptionService::new();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let policy = ConscriptionPolicy {
            interval: 360,
            rate: 0.05,
            permanent: false,
            casualty_rate: 0.0,
        };

        let event = service
            .maybe_draft(360, &policy, &mut registry, &mut buildings, &[], &mut rng)
            .unwrap();
        assert_eq!(event.drafted, 2);
        assert_eq!(event.return_tick, 1080);
        assert_eq!(registry.len(), 38);
        assert_eq!(service.in_service(), 2);

        assert_eq!(service.process_returns(1079, &mut registry), 0);
        assert_eq!(service.process_returns(1080, &mut registry), 2);
        assert_eq!(registry.len(), 40);
        assert!(registry.iter().all(|c| c.assignment == Assignment::Idle));
        assert_eq!(
            registry.iter().filter(|c| c.class == CitizenClass::Soldier).count(),
            2
        );
    }

    #[test]
    fn test_flagged_citizens_are_not_drafted() {
        let mut registry = village(3, 0);
        let mut buildings = BuildingArchetype::new();
        let mut service = ConscriptionService::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let policy = ConscriptionPolicy {
            interval: 1,
            rate: 1.0,
            permanent: true,
            casualty_rate: 0.0,
        };
        let flagged: Vec<CitizenId> = registry.iter().take(2).map(|c| c.id).collect();

        let event = service
            .maybe_draft(1, &policy, &mut registry, &mut buildings, &flagged, &mut rng)
            .unwrap();
        assert_eq!(event.drafted, 1);
        for id in &flagged {
            assert!(registry.get(*id).is_some());
        }
    }

    #[test]
    fn test_draft_releases_jobs() {
        let mut registry = village(1, 0);
        let mut buildings = BuildingArchetype::new();
        buildings.spawn(BuildingId(100), BuildingType::Sawmill, GridPos::new(1, 1), 0);
        let id = registry.iter().next().unwrap().id;
        buildings.workers[0].push(id);
        registry.get_mut(id).unwrap().assignment = Assignment::Job(BuildingId(100));

        let mut service = ConscriptionService::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let policy = ConscriptionPolicy {
            interval: 1,
            rate: 1.0,
            permanent: true,
            casualty_rate: 0.0,
        };
        service.maybe_draft(1, &policy, &mut registry, &mut buildings, &[], &mut rng);
        assert!(buildings.workers[0].is_empty());
        assert!(registry.is_empty());
    }
}
