//! Worker governor - assigns idle citizens to job slots
//!
//! Each tick the governor:
//! 1. Reconciles existing assignments (demolished buildings, aged-out workers)
//! 2. Ranks idle working-age citizens by skill, then hunger, then id
//! 3. Fills open slots in focus order (or round-robin for Balanced)
//! 4. Places leftover workers in the focus role up to the overstaff limit
//!
//! Staffing reports (efficiency, effective workers) are computed separately
//! by [`compute_staffing`] once power has been distributed.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

use crate::city::building::{BuildingArchetype, BuildingRole};
use crate::core::config::WorkforceConfig;
use crate::core::types::{BuildingId, CitizenId};
use crate::population::citizen::{Assignment, CitizenClass};
use crate::population::registry::CitizenRegistry;
use crate::workforce::efficiency::{
    building_efficiency, effective_workers, operating_factor, Efficiency, EfficiencyInputs,
};
use crate::workforce::focus::CollectiveFocus;

/// Outcome of one assignment pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernorReport {
    pub assigned: u32,
    pub idle: u32,
    pub newly_assigned: u32,
    pub released: u32,
    /// Assignments that pointed at a missing citizen or building
    pub lookup_misses: u32,
}

/// Per-building staffing after assignment and power
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingReport {
    pub building: BuildingId,
    pub raw_workers: u32,
    pub effective_workers: f32,
    pub efficiency: Efficiency,
    /// Health x power x morale, without staffing
    pub operating: f32,
    /// Mean of worker contribution x class role bonus
    pub mean_contribution: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerGovernor {
    focus: CollectiveFocus,
}

struct Candidate {
    id: CitizenId,
    class: CitizenClass,
}

impl WorkerGovernor {
    pub fn new(focus: CollectiveFocus) -> Self {
        Self { focus }
    }

    pub fn focus(&self) -> CollectiveFocus {
        self.focus
    }

    /// Takes effect on the next assignment pass; existing jobs persist
    pub fn set_focus(&mut self, focus: CollectiveFocus) {
        self.focus = focus;
    }

    /// Run one assignment pass
    pub fn assign(
        &self,
        registry: &mut CitizenRegistry,
        buildings: &mut BuildingArchetype,
        config: &WorkforceConfig,
    ) -> GovernorReport {
        let mut report = GovernorReport::default();
        reconcile(registry, buildings, config, &mut report);

        let mut pool: Vec<Candidate> = {
            let mut idle: Vec<_> = registry
                .iter()
                .filter(|c| c.assignment.is_idle())
                .filter(|c| c.is_working_age(config.min_working_age, config.max_working_age))
                .collect();
            idle.sort_by_key(|c| (Reverse(OrderedFloat(c.skill)), OrderedFloat(c.hunger), c.id));
            idle.into_iter()
                .map(|c| Candidate { id: c.id, class: c.class })
                .collect()
        };

        // Collect assignments first, apply afterwards
        let mut placements: Vec<(usize, CitizenId)> = Vec::new();

        if self.focus == CollectiveFocus::Balanced {
            fill_balanced(buildings, &mut pool, &mut placements);
        } else {
            fill_by_priority(self.focus, buildings, &mut pool, &mut placements);
            if let Some(role) = self.focus.primary_role() {
                overstaff(role, buildings, config, &mut pool, &mut placements);
            }
        }

        for (index, citizen_id) in placements {
            let building_id = buildings.ids[index];
            if let Some(citizen) = registry.get_mut(citizen_id) {
                citizen.assignment = Assignment::Job(building_id);
                buildings.workers[index].push(citizen_id);
                report.newly_assigned += 1;
                debug!(citizen = citizen_id.0, building = building_id.0, "assigned worker");
            }
        }

        report.assigned = registry.iter().filter(|c| !c.assignment.is_idle()).count() as u32;
        report.idle = registry
            .iter()
            .filter(|c| c.assignment.is_idle())
            .filter(|c| c.is_working_age(config.min_working_age, config.max_working_age))
            .count() as u32;
        report
    }
}

/// Drop assignments that no longer hold on either side
fn reconcile(
    registry: &mut CitizenRegistry,
    buildings: &mut BuildingArchetype,
    config: &WorkforceConfig,
    report: &mut GovernorReport,
) {
    let index: AHashMap<BuildingId, usize> =
        buildings.ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    for citizen in registry.iter_mut() {
        let Some(building) = citizen.assignment.building() else {
            continue;
        };
        let listed = index
            .get(&building)
            .is_some_and(|i| buildings.workers[*i].contains(&citizen.id));
        if !listed {
            debug!(citizen = citizen.id.0, building = building.0, "stale assignment cleared");
            citizen.assignment = Assignment::Idle;
            citizen.efficiency = 0.0;
            report.lookup_misses += 1;
        } else if !citizen.is_working_age(config.min_working_age, config.max_working_age)
            || index
                .get(&building)
                .is_some_and(|i| !citizen.class.can_staff(buildings.building_types[*i].role()))
        {
            if let Some(i) = index.get(&building) {
                buildings.workers[*i].retain(|c| *c != citizen.id);
            }
            citizen.assignment = Assignment::Idle;
            citizen.efficiency = 0.0;
            report.released += 1;
        }
    }

    for (i, workers) in buildings.workers.iter_mut().enumerate() {
        let building = buildings.ids[i];
        let before = workers.len();
        workers.retain(|id| {
            registry
                .get(*id)
                .is_some_and(|c| c.assignment == Assignment::Job(building))
        });
        let dropped = before - workers.len();
        if dropped > 0 {
            debug!(building = building.0, dropped, "worker list entries without citizen");
            report.lookup_misses += dropped as u32;
        }
    }
}

/// Take the best-ranked candidate eligible for `role`
fn take_candidate(pool: &mut Vec<Candidate>, role: BuildingRole) -> Option<CitizenId> {
    let pos = pool.iter().position(|c| c.class.can_staff(role))?;
    Some(pool.remove(pos).id)
}

fn fill_by_priority(
    focus: CollectiveFocus,
    buildings: &BuildingArchetype,
    pool: &mut Vec<Candidate>,
    placements: &mut Vec<(usize, CitizenId)>,
) {
    let mut order: Vec<usize> = buildings.iter_workplaces().collect();
    order.sort_by_key(|i| (focus.rank(buildings.building_types[*i].role()), buildings.ids[*i]));

    for i in order {
        let role = buildings.building_types[i].role();
        let capacity = buildings.building_types[i].worker_capacity() as usize;
        let mut filled = buildings.workers[i].len();
        while filled < capacity {
            match take_candidate(pool, role) {
                Some(id) => {
                    placements.push((i, id));
                    filled += 1;
                }
                None => break,
            }
        }
        if pool.is_empty() {
            return;
        }
    }
}

fn fill_balanced(
    buildings: &BuildingArchetype,
    pool: &mut Vec<Candidate>,
    placements: &mut Vec<(usize, CitizenId)>,
) {
    let mut filled: Vec<(usize, usize)> = buildings
        .iter_workplaces()
        .map(|i| (i, buildings.workers[i].len()))
        .collect();

    loop {
        // Lowest staffing ratio among buildings with an open slot and an eligible candidate
        let next = filled
            .iter_mut()
            .filter(|(i, count)| {
                let t = buildings.building_types[*i];
                *count < t.worker_capacity() as usize
                    && pool.iter().any(|c| c.class.can_staff(t.role()))
            })
            .min_by_key(|(i, count)| {
                let cap = buildings.building_types[*i].worker_capacity() as f32;
                (OrderedFloat(*count as f32 / cap), buildings.ids[*i])
            });
        let Some((i, count)) = next else {
            return;
        };
        let role = buildings.building_types[*i].role();
        match take_candidate(pool, role) {
            Some(id) => {
                placements.push((*i, id));
                *count += 1;
            }
            None => return,
        }
    }
}

fn overstaff(
    role: BuildingRole,
    buildings: &BuildingArchetype,
    config: &WorkforceConfig,
    pool: &mut Vec<Candidate>,
    placements: &mut Vec<(usize, CitizenId)>,
) {
    let mut targets: Vec<usize> = buildings
        .iter_workplaces()
        .filter(|i| buildings.building_types[*i].role() == role)
        .collect();
    targets.sort_by_key(|i| buildings.ids[*i]);

    for i in targets {
        let cap = buildings.building_types[i].worker_capacity() as f32;
        let limit = (cap * config.overstaff_limit).floor() as usize;
        let mut filled =
            buildings.workers[i].len() + placements.iter().filter(|(b, _)| *b == i).count();
        while filled < limit {
            match take_candidate(pool, role) {
                Some(id) => {
                    placements.push((i, id));
                    filled += 1;
                }
                None => return,
            }
        }
    }
}

/// Compute efficiency for every workplace and write per-citizen efficiency.
///
/// Must run after power distribution so `powered` is current.
pub fn compute_staffing(
    buildings: &BuildingArchetype,
    registry: &mut CitizenRegistry,
    config: &WorkforceConfig,
) -> Vec<StaffingReport> {
    for citizen in registry.iter_mut() {
        citizen.efficiency = 0.0;
    }

    let mut reports = Vec::new();
    for i in buildings.iter_workplaces() {
        let building_type = buildings.building_types[i];
        let role = building_type.role();
        let members: Vec<_> = buildings.workers[i]
            .iter()
            .filter_map(|id| registry.get(*id))
            .collect();
        let raw = members.len() as u32;

        let morale = if members.is_empty() {
            100.0
        } else {
            members.iter().map(|c| c.morale).sum::<f32>() / raw as f32
        };
        let inputs = EfficiencyInputs {
            workers: raw,
            capacity: building_type.worker_capacity(),
            health: buildings.health[i],
            requires_power: building_type.requires_power(),
            powered: buildings.powered[i],
            morale,
        };
        let efficiency = building_efficiency(&inputs);
        let mean_contribution = if members.is_empty() {
            0.0
        } else {
            members
                .iter()
                .map(|c| c.work_contribution() * c.class.role_bonus(role))
                .sum::<f32>()
                / raw as f32
        };

        let per_building = efficiency.percent / 100.0;
        let ids: Vec<CitizenId> = members.iter().map(|c| c.id).collect();
        for id in ids {
            if let Some(citizen) = registry.get_mut(id) {
                citizen.efficiency = (per_building * citizen.work_contribution()).clamp(0.0, 1.0);
            }
        }

        reports.push(StaffingReport {
            building: buildings.ids[i],
            raw_workers: raw,
            effective_workers: effective_workers(
                raw,
                building_type.worker_capacity(),
                config.overstaff_bonus,
            ),
            efficiency,
            operating: operating_factor(&inputs),
            mean_contribution,
        });
    }
    reports
}
