//! Political risk: the chairman's personnel file and the people who act on it
//!
//! Within a tick, investigations resolve before conscription so a citizen
//! flagged by the KGB is never also drafted in the same step.

pub mod conscription;
pub mod entities;
pub mod kgb;
pub mod mandates;
pub mod personnel;
pub mod politburo;

pub use conscription::{ConscriptionEvent, ConscriptionService};
pub use entities::{EntityRole, PoliticalEntities, PoliticalEntity};
pub use kgb::{Intensity, InvestigationResult, KgbInvestigation, KgbService};
pub use mandates::{Mandate, MandateProgress, MandateState, MandateVerdict};
pub use personnel::{PersonnelFile, ThreatLevel, ARREST_MARKS};
pub use politburo::Politburo;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::city::building::BuildingArchetype;
use crate::core::config::PoliticalConfig;
use crate::core::types::{BuildingId, CitizenId, EntityId, IdAllocator, Tick};
use crate::economy::doctrine::Doctrine;
use crate::economy::quota::QuotaOutcome;
use crate::population::citizen::{Assignment, CitizenClass};
use crate::population::registry::CitizenRegistry;

pub const QUOTA_FAILED_MARK: f64 = 2.0;
pub const QUOTA_MET_COMMENDATION: f64 = 1.0;
pub const LABOUR_PLAN_COMMENDATION: f64 = 0.5;
pub const BLAT_DETECTED_MARK: f64 = 1.0;
pub const SABOTAGE_MARK: f64 = 0.5;

pub const POLITRUK_TICKS: u32 = 90;
pub const OFFICER_TICKS: u32 = 10;
/// Morale threshold bump while the settlement freezes
pub const COLD_MORALE_BUMP: f32 = 10.0;
/// Morale per tick per 100 effectiveness
const POLITRUK_MORALE_RATE: f32 = 0.05;

const POLITRUK_NAMES: &[&str] = &[
    "Comrade Zhdanov",
    "Comrade Suslov",
    "Comrade Kaganovich",
    "Comrade Mekhlis",
    "Comrade Shcherbakov",
];
const KGB_NAMES: &[&str] = &["Agent Yezhov", "Agent Abakumov", "Agent Serov", "Agent Semichastny"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSummary {
    pub drafted: u32,
    pub casualties: u32,
    pub permanent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoliticalReport {
    pub threat: Option<ThreatLevel>,
    pub arrested: bool,
    pub investigation_opened: bool,
    pub flagged: Vec<CitizenId>,
    pub concluded: Vec<InvestigationResult>,
    pub kgb_losses: u32,
    pub draft: Option<DraftSummary>,
    pub returned: usize,
    pub politruk_posted: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliticalSystem {
    personnel: PersonnelFile,
    entities: PoliticalEntities,
    kgb: KgbService,
    conscription: ConscriptionService,
    politburo: Politburo,
    mandates: MandateState,
    ids: IdAllocator,
}

impl PoliticalSystem {
    pub fn new(doctrine: Doctrine, cfg: &PoliticalConfig) -> Self {
        Self {
            personnel: PersonnelFile::new(cfg.mark_decay_ticks),
            entities: PoliticalEntities::new(),
            kgb: KgbService::new(),
            conscription: ConscriptionService::new(),
            politburo: Politburo::new(doctrine, cfg.politburo_start_patience),
            mandates: MandateState::new(doctrine),
            ids: IdAllocator::new(),
        }
    }

    pub fn personnel(&self) -> &PersonnelFile {
        &self.personnel
    }

    pub fn entities(&self) -> &PoliticalEntities {
        &self.entities
    }

    pub fn kgb(&self) -> &KgbService {
        &self.kgb
    }

    pub fn conscription(&self) -> &ConscriptionService {
        &self.conscription
    }

    pub fn politburo(&self) -> &Politburo {
        &self.politburo
    }

    pub fn mandates(&self) -> &MandateState {
        &self.mandates
    }

    pub fn threat(&self, now: Tick) -> ThreatLevel {
        self.personnel.threat(now)
    }

    pub fn is_arrested(&self) -> bool {
        self.personnel.is_arrested()
    }

    pub fn add_mark(&mut self, magnitude: f64, now: Tick, reason: &str) {
        debug!(magnitude, reason, "black mark");
        self.personnel.add_mark(magnitude, now, reason);
    }

    pub fn add_commendation(&mut self, magnitude: f64, now: Tick, reason: &str) {
        debug!(magnitude, reason, "commendation");
        self.personnel.add_commendation(magnitude, now, reason);
    }

    /// Book a closed quota into the file and the politburo's mood
    pub fn record_quota(&mut self, outcome: QuotaOutcome, now: Tick) {
        self.politburo.record_quota(outcome);
        match outcome {
            QuotaOutcome::Met { .. } => self.add_commendation(QUOTA_MET_COMMENDATION, now, "plan fulfilled"),
            QuotaOutcome::Failed => self.add_mark(QUOTA_FAILED_MARK, now, "plan failed"),
        }
    }

    /// Judge the closing era's mandates and adopt the next era's
    pub fn close_era(&mut self, buildings: &BuildingArchetype, next: Doctrine, now: Tick) -> MandateVerdict {
        let verdict = self.mandates.close_era(buildings, next);
        self.add_commendation(verdict.commendation(), now, "era mandates fulfilled");
        self.add_mark(verdict.marks(), now, "era mandates unfulfilled");
        verdict
    }

    #[allow(clippy::too_many_arguments)]
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: Tick,
        doctrine: Doctrine,
        heating_failing: bool,
        registry: &mut CitizenRegistry,
        buildings: &mut BuildingArchetype,
        cfg: &PoliticalConfig,
        rng: &mut R,
    ) -> PoliticalReport {
        let mut report = PoliticalReport::default();
        self.politburo.follow_doctrine(doctrine);
        self.entities.tick_lifetimes();

        // Investigations
        let threat = self.personnel.threat(now);
        let agent = self.ids.entity();
        let opened = self
            .kgb
            .maybe_open(
                threat,
                cfg.kgb_watch_threshold,
                cfg.kgb_base_chance,
                self.politburo.kgb_pressure(),
                cfg.max_investigations,
                buildings,
                agent,
                rng,
            )
            .map(|inv| (inv.target_building, inv.ticks_remaining));
        if let Some((target, duration)) = opened {
            let name = KGB_NAMES.choose(rng).copied().unwrap_or("Agent Serov");
            self.entities.insert(PoliticalEntity {
                id: agent,
                role: EntityRole::KgbAgent,
                name: name.to_string(),
                station: Some(target),
                effectiveness: rng.gen_range(40.0..90.0),
                target_building: Some(target),
                ticks_remaining: duration,
            });
            report.investigation_opened = true;
        }

        let (flagged, concluded) = self.kgb.tick(buildings, registry, rng);
        for inv in self.kgb.investigations() {
            if let Some(agent) = self.entities.get_mut(inv.agent) {
                agent.ticks_remaining = inv.ticks_remaining;
            }
        }
        for result in &concluded {
            self.entities.remove(result.agent);
            self.add_mark(result.marks, now, "kgb investigation");
            if result.intensity.arrests_flagged() {
                for id in &result.flagged {
                    if imprison(*id, registry, buildings) {
                        report.kgb_losses += 1;
                    }
                }
            }
        }
        report.flagged = flagged;
        report.concluded = concluded;

        // Conscription
        report.returned = self.conscription.process_returns(now, registry);
        let policy = doctrine.conscription();
        let draft = self
            .conscription
            .maybe_draft(now, &policy, registry, buildings, &report.flagged, rng)
            .map(|event| {
                (
                    event.officer_name.clone(),
                    DraftSummary {
                        drafted: event.drafted,
                        casualties: event.casualties,
                        permanent: event.is_permanent(),
                    },
                )
            });
        if let Some((officer_name, summary)) = draft {
            self.post_officer(EntityRole::ConscriptionOfficer, officer_name);
            if doctrine == Doctrine::Wartime {
                self.post_officer(EntityRole::MilitaryOfficer, "Commissar of the Front".to_string());
            }
            report.draft = Some(summary);
        }

        // Politruks
        let mut threshold = cfg.politruk_morale_threshold;
        if heating_failing {
            threshold += COLD_MORALE_BUMP;
        }
        if self.entities.count_role(EntityRole::Politruk) == 0 && registry.average_morale() < threshold {
            report.politruk_posted = self.post_politruk(buildings, rng);
        }
        self.agitate(registry, buildings);

        report.arrested = self.personnel.check_arrest(now);
        report.threat = Some(self.personnel.threat(now));
        report
    }

    fn post_officer(&mut self, role: EntityRole, name: String) {
        let id = self.ids.entity();
        self.entities.insert(PoliticalEntity {
            id,
            role,
            name,
            station: None,
            effectiveness: 50.0,
            target_building: None,
            ticks_remaining: OFFICER_TICKS,
        });
    }

    /// Station a politruk at the most staffed building, lowest id on ties
    fn post_politruk<R: Rng + ?Sized>(&mut self, buildings: &BuildingArchetype, rng: &mut R) -> Option<EntityId> {
        let station = buildings
            .iter_workplaces()
            .filter(|i| !buildings.workers[*i].is_empty())
            .max_by(|a, b| {
                buildings.workers[*a]
                    .len()
                    .cmp(&buildings.workers[*b].len())
                    .then(buildings.ids[*b].cmp(&buildings.ids[*a]))
            })
            .map(|i| buildings.ids[i])?;

        let id = self.ids.entity();
        let name = POLITRUK_NAMES.choose(rng).copied().unwrap_or("Comrade Suslov");
        info!(politruk = name, building = station.0, "politruk posted");
        self.entities.insert(PoliticalEntity {
            id,
            role: EntityRole::Politruk,
            name: name.to_string(),
            station: Some(station),
            effectiveness: rng.gen_range(30.0..90.0),
            target_building: None,
            ticks_remaining: POLITRUK_TICKS,
        });
        Some(id)
    }

    fn agitate(&self, registry: &mut CitizenRegistry, buildings: &BuildingArchetype) {
        let postings: Vec<(BuildingId, f32)> = self
            .entities
            .iter()
            .filter(|e| e.role == EntityRole::Politruk)
            .filter_map(|e| e.station.map(|s| (s, POLITRUK_MORALE_RATE * e.effectiveness / 100.0)))
            .collect();
        for (station, boost) in postings {
            let Some(index) = buildings.index_of(station) else {
                continue;
            };
            for worker in &buildings.workers[index] {
                if let Some(citizen) = registry.get_mut(*worker) {
                    citizen.adjust_morale(boost);
                }
            }
        }
    }
}

/// Sentence a purged citizen to labour: their job is lost and they come
/// back to the pool as a prisoner. False if there was no one left to take.
fn imprison(id: CitizenId, registry: &mut CitizenRegistry, buildings: &mut BuildingArchetype) -> bool {
    let Some(citizen) = registry.get_mut(id) else {
        debug!(citizen = id.0, "purged citizen already gone");
        return false;
    };
    if citizen.class == CitizenClass::Prisoner {
        return false;
    }
    if let Some(building) = citizen.assignment.building() {
        buildings.release_worker(building, id);
    }
    citizen.class = CitizenClass::Prisoner;
    citizen.assignment = Assignment::Idle;
    citizen.efficiency = 0.0;
    info!(citizen = id.0, "citizen sent to the camps");
    true
}
