//! One world tick
//!
//! Fixed order: commands, worker governor, power and production, economy,
//! demographics, settlement tier, politics, events, scoring, calendar.
//! Each stage reads what the previous one wrote. A failing stage rolls the
//! whole world back to its state at tick start.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::city::building::BuildingRole;
use crate::city::power::{distribute_power, PowerReport};
use crate::city::production::{tick_production, ProductionReport};
use crate::core::error::{Result, SimError};
use crate::core::types::Tick;
use crate::economy::blat::PurchaseOutcome;
use crate::economy::doctrine::Doctrine;
use crate::economy::quota::QuotaOutcome;
use crate::economy::resources::ResourceKind;
use crate::economy::{EconomyInputs, EconomySignals};
use crate::events::GameEvent;
use crate::political::{PoliticalReport, BLAT_DETECTED_MARK, LABOUR_PLAN_COMMENDATION, SABOTAGE_MARK};
use crate::population::citizen::{Assignment, Citizen, CitizenClass};
use crate::population::demographics::{age_population, monthly_demographics};
use crate::population::dvor::{apply_food_loyalty, roll_unrest, Unrest};
use crate::settlement::{SettlementMetrics, TierChange};
use crate::simulation::command::{CommandOutcome, RejectReason, SimCommand};
use crate::simulation::world::SimulationWorld;
use crate::workforce::governor::{compute_staffing, GovernorReport};

/// Health a sabotaged building loses
pub const SABOTAGE_DAMAGE: f32 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemographicsSummary {
    pub births: u32,
    pub deaths: u32,
    pub fled: u32,
    pub fell_ill: u32,
}

/// Everything observable that happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    pub commands: Vec<CommandOutcome>,
    pub governor: GovernorReport,
    pub power: PowerReport,
    pub production: ProductionReport,
    pub economy: EconomySignals,
    pub demographics: Option<DemographicsSummary>,
    pub unrest: Vec<Unrest>,
    pub tier_change: Option<TierChange>,
    pub political: PoliticalReport,
    pub event: Option<GameEvent>,
    pub era_closed: Option<Doctrine>,
    pub arrested: bool,
}

impl SimulationWorld {
    /// Run one tick. After an arrest every call returns `SessionEnded`.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TickReport> {
        if self.game_over {
            return Err(SimError::SessionEnded);
        }
        let checkpoint = self.clone();
        match self.run_tick(rng) {
            Ok(report) => {
                self.last_report = Some(report.clone());
                Ok(report)
            }
            Err(err) => {
                warn!(error = %err, tick = checkpoint.current_tick(), "tick failed, state rolled back");
                *self = checkpoint;
                Err(err)
            }
        }
    }

    fn run_tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TickReport> {
        let now = self.calendar.current_tick();
        let mut report = TickReport {
            tick: now,
            ..TickReport::default()
        };
        self.store.clear_shortages();
        let marks_before = self.political.personnel().black_marks();
        let commendations_before = self.political.personnel().commendations();

        for command in std::mem::take(&mut self.pending) {
            let outcome = self.apply_command(command, now, rng);
            if outcome.is_rejected() {
                debug!(?outcome, "command rejected");
            }
            report.commands.push(outcome);
        }

        report.governor = self
            .governor
            .assign(&mut self.registry, &mut self.buildings, &self.config.workforce);

        report.power = distribute_power(&mut self.buildings, &self.recipes, &mut self.store);
        let staffing = compute_staffing(&self.buildings, &mut self.registry, &self.config.workforce);
        report.production = tick_production(&self.buildings, &staffing, &self.recipes, &mut self.store);

        report.economy = self.economy.tick(
            EconomyInputs {
                calendar: &self.calendar,
                production: &report.production,
                buildings: &self.buildings,
                fondy_multiplier: self.settlement.tier().fondy_multiplier(),
            },
            &mut self.registry,
            &mut self.store,
            &self.config.economy,
            &self.config.workforce,
        );
        self.book_economy_signals(&report.economy, now);

        if self.calendar.is_month_end() {
            let (summary, unrest) = self.run_demographics(now, rng);
            report.demographics = Some(summary);
            report.unrest = unrest;
        }
        if self.calendar.is_year_end() {
            age_population(&mut self.registry);
        }

        self.store
            .set(ResourceKind::Population, self.registry.len() as f64);
        let metrics = SettlementMetrics::measure(self.registry.len() as u32, &self.buildings);
        report.tier_change = self.settlement.evaluate(&metrics, &self.config.tiers);
        if report.tier_change.is_some_and(|change| change.is_promotion()) {
            let workforce = &self.config.workforce;
            if let Some(id) = self.registry.appoint(
                CitizenClass::PartyOfficial,
                workforce.min_working_age,
                workforce.max_working_age,
            ) {
                info!(citizen = id.0, tier = self.settlement.tier().name(), "party official appointed");
            }
        }

        report.political = self.political.tick(
            now,
            self.economy.doctrine(),
            self.economy.heating_failing(),
            &mut self.registry,
            &mut self.buildings,
            &self.config.political,
            rng,
        );
        if report.political.arrested {
            self.game_over = true;
            report.arrested = true;
        }

        report.event = self.events.tick(
            now,
            self.economy.doctrine(),
            self.calendar.season(),
            self.economy.heating_failing(),
            &mut self.store,
            &self.config.events,
            rng,
        );
        self.economy.settle_reserve(&self.store);

        // Scoring
        let new_marks = self.political.personnel().black_marks() - marks_before;
        for _ in 0..new_marks {
            self.scoring.record_black_mark();
        }
        let new_commendations = self.political.personnel().commendations() - commendations_before;
        for _ in 0..new_commendations {
            self.scoring.record_commendation();
        }
        self.scoring.record_kgb_losses(report.political.kgb_losses);
        if let Some(draft) = report.political.draft {
            self.scoring.record_conscripted(draft.drafted);
        }
        if let Some((_, next)) = report.economy.doctrine_changed {
            self.scoring.close_era(
                next,
                self.registry.len() as u32,
                self.buildings.count() as u32,
                now,
            );
            report.era_closed = Some(next);
        }

        self.calendar.advance();
        self.store
            .set(ResourceKind::Population, self.registry.len() as f64);
        self.store.verify()?;
        Ok(report)
    }

    fn apply_command<R: Rng + ?Sized>(&mut self, command: SimCommand, now: Tick, rng: &mut R) -> CommandOutcome {
        match command {
            SimCommand::SetCollectiveFocus(focus) => {
                self.governor.set_focus(focus);
                CommandOutcome::FocusChanged(focus)
            }
            SimCommand::PlaceBuilding {
                building_type,
                position,
            } => {
                let Some(terrain) = self.terrain.get(position) else {
                    return CommandOutcome::Rejected(RejectReason::OutOfBounds);
                };
                if !terrain.is_buildable() {
                    return CommandOutcome::Rejected(RejectReason::Unbuildable);
                }
                if self.buildings.is_occupied(position) {
                    return CommandOutcome::Rejected(RejectReason::Occupied);
                }
                let cost: Vec<_> = building_type
                    .required_materials()
                    .into_iter()
                    .map(|(kind, amount)| (kind, amount * terrain.movement_cost()))
                    .collect();
                if !self.store.consume_all(&cost) {
                    return CommandOutcome::Rejected(RejectReason::InsufficientMaterials);
                }
                let id = self.building_ids.building();
                self.buildings.spawn(id, building_type, position, now);
                info!(building = id.0, ?building_type, x = position.x, y = position.y, "building placed");
                CommandOutcome::Placed(id)
            }
            SimCommand::Demolish(id) => {
                let Some(workers) = self.buildings.remove(id) else {
                    return CommandOutcome::Rejected(RejectReason::UnknownBuilding);
                };
                for worker in &workers {
                    match self.registry.get_mut(*worker) {
                        Some(citizen) => {
                            citizen.assignment = Assignment::Idle;
                            citizen.efficiency = 0.0;
                        }
                        None => debug!(citizen = worker.0, "demolished building listed a missing worker"),
                    }
                }
                info!(building = id.0, released = workers.len(), "building demolished");
                CommandOutcome::Demolished {
                    building: id,
                    released: workers.len() as u32,
                }
            }
            SimCommand::BlackMarketPurchase { resource, amount } => {
                let outcome = self.economy.blat_mut().purchase(
                    resource,
                    amount,
                    &mut self.store,
                    &self.config.economy,
                    rng,
                );
                match outcome {
                    PurchaseOutcome::Rejected => CommandOutcome::Rejected(RejectReason::PurchaseRefused),
                    PurchaseOutcome::Completed { risk, detected } => {
                        if detected {
                            info!(?risk, "black market deal reported to the KGB");
                            self.political
                                .add_mark(BLAT_DETECTED_MARK, now, "black market dealings");
                        }
                        CommandOutcome::Purchased {
                            resource,
                            amount,
                            detected,
                        }
                    }
                }
            }
        }
    }

    fn book_economy_signals(&mut self, signals: &EconomySignals, now: Tick) {
        if let Some(outcome) = signals.quota {
            self.political.record_quota(outcome, now);
            if let QuotaOutcome::Met { exceeded } = outcome {
                self.scoring.record_quota_met(exceeded);
            }
        }
        if let Some(plan) = signals.labour_plan {
            if plan.is_met() {
                self.scoring
                    .record_quota_met(plan == crate::economy::trudodni::LabourPlan::Exceeded);
                self.political
                    .add_commendation(LABOUR_PLAN_COMMENDATION, now, "labour plan met");
            }
        }
        if let Some((_, next)) = signals.doctrine_changed {
            self.political.close_era(&self.buildings, next, now);
        }
    }

    fn run_demographics<R: Rng + ?Sized>(&mut self, now: Tick, rng: &mut R) -> (DemographicsSummary, Vec<Unrest>) {
        let food_level = self.economy.take_monthly_food_level();
        let demographics = monthly_demographics(
            &mut self.registry,
            food_level,
            self.buildings.has_role(BuildingRole::Medical),
            self.buildings.housing_capacity(),
            rng,
        );
        self.release_jobs(&demographics.deaths);

        apply_food_loyalty(self.registry.households_mut(), food_level);
        let unrest = roll_unrest(self.registry.households(), rng);
        let mut fled = 0;
        for outcome in &unrest {
            match *outcome {
                Unrest::Sabotage(dvor) => {
                    if self.buildings.count() > 0 {
                        let index = rng.gen_range(0..self.buildings.count());
                        self.buildings.damage(index, SABOTAGE_DAMAGE);
                        info!(dvor = dvor.0, building = self.buildings.ids[index].0, "sabotage");
                    }
                    self.political.add_mark(SABOTAGE_MARK, now, "sabotage in the collective");
                }
                Unrest::Flight(dvor) => {
                    let gone = self.registry.remove_household(dvor);
                    info!(dvor = dvor.0, members = gone.len(), "household fled");
                    fled += gone.len() as u32;
                    self.release_jobs(&gone);
                }
            }
        }

        let summary = DemographicsSummary {
            births: demographics.births,
            deaths: demographics.deaths.len() as u32,
            fled,
            fell_ill: demographics.fell_ill,
        };
        (summary, unrest)
    }

    fn release_jobs(&mut self, gone: &[Citizen]) {
        for citizen in gone {
            if let Some(building) = citizen.assignment.building() {
                self.buildings.release_worker(building, citizen.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::BuildingType;
    use crate::city::terrain::{TerrainGrid, TerrainKind};
    use crate::core::config::SimulationConfig;
    use crate::core::types::{BuildingId, GridPos};
    use crate::workforce::focus::CollectiveFocus;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world(seed: u64) -> (SimulationWorld, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let world = SimulationWorld::new(
            SimulationConfig::default(),
            TerrainGrid::filled(10, 10, TerrainKind::Plains),
            &mut rng,
        )
        .unwrap();
        (world, rng)
    }

    #[test]
    fn test_tick_advances_calendar() {
        let (mut world, mut rng) = world(1);
        let report = world.tick(&mut rng).unwrap();
        assert_eq!(report.tick, 0);
        assert_eq!(world.current_tick(), 1);
        assert!(report.governor.assigned > 0);
    }

    #[test]
    fn test_officials_and_soldiers_staff_their_posts() {
        let (mut world, mut rng) = world(12);
        let officials: Vec<_> = world
            .registry()
            .iter()
            .filter(|c| c.class == CitizenClass::PartyOfficial)
            .map(|c| c.id)
            .collect();
        assert_eq!(officials.len(), world.config().founding.party_officials as usize);

        // a demobilised conscript back from service
        let veteran = world
            .registry()
            .iter()
            .find(|c| c.class.is_civilian() && (20..=45).contains(&c.age))
            .map(|c| c.id)
            .unwrap();
        world.registry.get_mut(veteran).unwrap().class = CitizenClass::Soldier;

        world.submit(SimCommand::PlaceBuilding {
            building_type: BuildingType::PartyOffice,
            position: GridPos::new(2, 5),
        });
        world.submit(SimCommand::PlaceBuilding {
            building_type: BuildingType::Garrison,
            position: GridPos::new(4, 5),
        });
        world.tick(&mut rng).unwrap();
        world.tick(&mut rng).unwrap();

        let staff_of = |role: BuildingRole| -> Vec<_> {
            world
                .buildings()
                .iter_workplaces()
                .filter(|i| world.buildings().building_types[*i].role() == role)
                .flat_map(|i| world.buildings().workers[i].clone())
                .collect()
        };
        assert_eq!(staff_of(BuildingRole::Administration), officials);
        assert_eq!(staff_of(BuildingRole::Military), vec![veteran]);
    }

    #[test]
    fn test_disease_breaks_out_over_two_years() {
        let (mut world, mut rng) = world(14);
        let mut fell_ill = 0;
        let mut sick_seen = false;
        for _ in 0..720 {
            let Ok(report) = world.tick(&mut rng) else { break };
            fell_ill += report.demographics.map(|d| d.fell_ill).unwrap_or(0);
            sick_seen |= world.registry().iter().any(|c| c.diseased);
        }
        assert!(fell_ill > 0);
        assert!(sick_seen);
    }

    #[test]
    fn test_commands_wait_for_next_tick() {
        let (mut world, mut rng) = world(2);
        world.submit(SimCommand::SetCollectiveFocus(CollectiveFocus::Food));
        assert_eq!(world.governor().focus(), CollectiveFocus::Balanced);
        let report = world.tick(&mut rng).unwrap();
        assert_eq!(report.commands, vec![CommandOutcome::FocusChanged(CollectiveFocus::Food)]);
        assert_eq!(world.governor().focus(), CollectiveFocus::Food);
        assert!(world.pending_commands().is_empty());
    }

    #[test]
    fn test_placement_rules() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut cells = vec![TerrainKind::Plains; 100];
        cells[99] = TerrainKind::Water;
        let terrain = TerrainGrid::from_cells(10, 10, cells).unwrap();
        let mut world = SimulationWorld::new(SimulationConfig::default(), terrain, &mut rng).unwrap();

        world.submit(SimCommand::PlaceBuilding {
            building_type: BuildingType::Izba,
            position: GridPos::new(9, 9),
        });
        world.submit(SimCommand::PlaceBuilding {
            building_type: BuildingType::Izba,
            position: GridPos::new(0, 0),
        });
        world.submit(SimCommand::PlaceBuilding {
            building_type: BuildingType::Izba,
            position: GridPos::new(40, 0),
        });
        let report = world.tick(&mut rng).unwrap();
        assert_eq!(report.commands[0], CommandOutcome::Rejected(RejectReason::Unbuildable));
        assert_eq!(report.commands[1], CommandOutcome::Rejected(RejectReason::Occupied));
        assert_eq!(report.commands[2], CommandOutcome::Rejected(RejectReason::OutOfBounds));
    }

    #[test]
    fn test_rough_terrain_costs_more() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut cells = vec![TerrainKind::Plains; 100];
        cells[98] = TerrainKind::Forest;
        let terrain = TerrainGrid::from_cells(10, 10, cells).unwrap();
        let mut world = SimulationWorld::new(SimulationConfig::default(), terrain, &mut rng).unwrap();
        world.store.set(ResourceKind::Timber, 40.0);

        // an izba needs 30 timber, 45 on forest
        world.submit(SimCommand::PlaceBuilding {
            building_type: BuildingType::Izba,
            position: GridPos::new(8, 9),
        });
        world.submit(SimCommand::PlaceBuilding {
            building_type: BuildingType::Izba,
            position: GridPos::new(5, 5),
        });
        let report = world.tick(&mut rng).unwrap();
        assert_eq!(
            report.commands[0],
            CommandOutcome::Rejected(RejectReason::InsufficientMaterials)
        );
        assert!(matches!(report.commands[1], CommandOutcome::Placed(_)));
        assert!(world.buildings().is_occupied(GridPos::new(5, 5)));
        assert!(!world.buildings().is_occupied(GridPos::new(8, 9)));
    }

    #[test]
    fn test_demolish_releases_workers() {
        let (mut world, mut rng) = world(4);
        world.tick(&mut rng).unwrap();
        let farm = world
            .buildings()
            .ids
            .iter()
            .zip(&world.buildings().building_types)
            .find(|(_, t)| **t == BuildingType::KolkhozFarm)
            .map(|(id, _)| *id)
            .unwrap();
        world.submit(SimCommand::Demolish(farm));
        world.submit(SimCommand::Demolish(BuildingId(9999)));
        let report = world.tick(&mut rng).unwrap();
        assert!(matches!(report.commands[0], CommandOutcome::Demolished { .. }));
        assert_eq!(report.commands[1], CommandOutcome::Rejected(RejectReason::UnknownBuilding));
        assert!(world
            .registry()
            .iter()
            .all(|c| c.assignment.building() != Some(farm)));
    }

    #[test]
    fn test_arrest_ends_session() {
        let (mut world, mut rng) = world(5);
        world.political.add_mark(7.0, 0, "denounced");
        let report = world.tick(&mut rng).unwrap();
        assert!(report.arrested);
        assert!(world.is_game_over());
        assert!(matches!(world.tick(&mut rng), Err(SimError::SessionEnded)));
        assert_eq!(world.current_tick(), 1);
    }

    #[test]
    fn test_failed_verification_rolls_back() {
        let (mut world, mut rng) = world(6);
        world.tick(&mut rng).unwrap();
        world.store.money = f64::NAN;
        let before = world.current_tick();
        assert!(matches!(world.tick(&mut rng), Err(SimError::InvariantViolation(_))));
        assert_eq!(world.current_tick(), before);
        assert!(world.resources().money.is_nan());
    }
}
