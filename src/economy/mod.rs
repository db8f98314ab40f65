//! Economic planning - the command economy's extraction and distribution
//!
//! One tick of the economy runs after production has been booked:
//! 1. Doctrine follows the calendar year (never backwards)
//! 2. Trudodni accumulate from assigned workers
//! 3. Compulsory deliveries take their share of gross output
//! 4. Fondy reliability drifts; allocations arrive at month end
//! 5. Blat decays
//! 6. Rations are eaten (reserve only on shortfall), then vodka, then
//!    heating fuel is burned
//! 7. Quota progress and, at year end, the labour plan

pub mod blat;
pub mod deliveries;
pub mod doctrine;
pub mod fondy;
pub mod heating;
pub mod quota;
pub mod resources;
pub mod trudodni;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::city::building::BuildingArchetype;
use crate::city::production::ProductionReport;
use crate::core::calendar::Calendar;
use crate::core::config::{EconomyConfig, WorkforceConfig};
use crate::population::registry::CitizenRegistry;

pub use blat::{black_market_price, BlatRisk, BlatSystem, PurchaseOutcome};
pub use deliveries::{collect_deliveries, DeliveryReport, RemainderSplit, RATION_SHARE};
pub use doctrine::{ConscriptionPolicy, DeliveryRates, Doctrine};
pub use fondy::{FondyDelivery, FondySystem};
pub use heating::{tick_heating, HeatingKind, HeatingReport};
pub use quota::{quota_resource, Quota, QuotaOutcome};
pub use resources::{ResourceKind, ResourceStore, Shortage, ShortageSource};
pub use trudodni::{LabourPlan, TrudodniLedger};

/// Per-tick hunger drift toward the food-level target
const HUNGER_RATE: f32 = 0.1;
/// Morale lost by a dependent citizen who goes without vodka
const VODKA_MORALE_PENALTY: f32 = 1.0;
/// Morale lost per tick by a citizen who did not get enough to eat
const HUNGER_MORALE_PENALTY: f32 = 0.2;

/// Signals the economy hands to the political, event and scoring layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomySignals {
    pub doctrine_changed: Option<(Doctrine, Doctrine)>,
    pub heating: HeatingReport,
    pub food_level: f32,
    pub split: RemainderSplit,
    /// Reserve food eaten because rations ran out
    pub reserve_drawn: f64,
    pub deliveries: DeliveryReport,
    pub fondy: Option<FondyDelivery>,
    pub quota: Option<QuotaOutcome>,
    pub labour_plan: Option<LabourPlan>,
}

/// What the economy reads from the rest of the world each tick
pub struct EconomyInputs<'a> {
    pub calendar: &'a Calendar,
    pub production: &'a ProductionReport,
    pub buildings: &'a BuildingArchetype,
    pub fondy_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomySystem {
    doctrine: Doctrine,
    trudodni: TrudodniLedger,
    fondy: FondySystem,
    blat: BlatSystem,
    quota: Quota,
    heating: HeatingKind,
    heating_failing: bool,
    food_level: f32,
    /// Part of the food stock earmarked by the remainder split; never more
    /// than the food actually in store
    strategic_reserve: f64,
    month_food_sum: f64,
    month_food_ticks: u32,
}

impl EconomySystem {
    pub fn new(config: &EconomyConfig, start_year: u32) -> Self {
        let doctrine = Doctrine::for_year(start_year);
        Self {
            doctrine,
            trudodni: TrudodniLedger::new(),
            fondy: FondySystem::new(config.fondy_start_reliability),
            blat: BlatSystem::new(),
            quota: Quota::new(
                quota_resource(doctrine),
                config.base_quota_target,
                start_year + config.quota_years,
            ),
            heating: HeatingKind::Pechka,
            heating_failing: false,
            food_level: 1.0,
            strategic_reserve: 0.0,
            month_food_sum: 0.0,
            month_food_ticks: 0,
        }
    }

    pub fn doctrine(&self) -> Doctrine {
        self.doctrine
    }

    pub fn delivery_rates(&self) -> DeliveryRates {
        self.doctrine.delivery_rates()
    }

    pub fn trudodni(&self) -> &TrudodniLedger {
        &self.trudodni
    }

    pub fn fondy(&self) -> &FondySystem {
        &self.fondy
    }

    pub fn blat(&self) -> &BlatSystem {
        &self.blat
    }

    pub fn blat_mut(&mut self) -> &mut BlatSystem {
        &mut self.blat
    }

    pub fn quota(&self) -> &Quota {
        &self.quota
    }

    pub fn heating(&self) -> HeatingKind {
        self.heating
    }

    pub fn heating_failing(&self) -> bool {
        self.heating_failing
    }

    pub fn food_level(&self) -> f32 {
        self.food_level
    }

    pub fn strategic_reserve(&self) -> f64 {
        self.strategic_reserve
    }

    /// Shrink the reserve to the food left in store; returns the amount lost
    pub fn settle_reserve(&mut self, store: &ResourceStore) -> f64 {
        let lost = (self.strategic_reserve - store.food).max(0.0);
        self.strategic_reserve -= lost;
        lost
    }

    /// Mean food level since the last call; resets the monthly window
    pub fn take_monthly_food_level(&mut self) -> f32 {
        let level = if self.month_food_ticks == 0 {
            self.food_level
        } else {
            (self.month_food_sum / self.month_food_ticks as f64) as f32
        };
        self.month_food_sum = 0.0;
        self.month_food_ticks = 0;
        level
    }

    pub fn tick(
        &mut self,
        inputs: EconomyInputs<'_>,
        registry: &mut CitizenRegistry,
        store: &mut ResourceStore,
        config: &EconomyConfig,
        workforce: &WorkforceConfig,
    ) -> EconomySignals {
        let mut signals = EconomySignals::default();
        let calendar = inputs.calendar;

        let next = self.doctrine.advance_for_year(calendar.year());
        if next != self.doctrine {
            info!(from = self.doctrine.name(), to = next.name(), "doctrine changed");
            signals.doctrine_changed = Some((self.doctrine, next));
            self.doctrine = next;
        }

        let contributed: f64 = registry
            .iter()
            .filter(|c| !c.assignment.is_idle())
            .map(|c| c.efficiency as f64)
            .sum();
        let working_age =
            registry.working_age_count(workforce.min_working_age, workforce.max_working_age);
        self.trudodni
            .accumulate(contributed, working_age, config.min_trudodni_per_worker);

        let rates = self.doctrine.delivery_rates();
        signals.deliveries = collect_deliveries(rates, inputs.production, store);

        self.fondy.update_reliability(rates.food, config);
        if calendar.is_month_end() {
            signals.fondy = Some(self.fondy.deliver(config, inputs.fondy_multiplier, store));
        }

        self.blat.decay(config);

        signals.split = RemainderSplit::of(
            inputs.production.gross_of(ResourceKind::Food),
            signals.deliveries.delivered(ResourceKind::Food),
        );
        self.settle_reserve(store);
        self.strategic_reserve = (self.strategic_reserve + signals.split.reserve).min(store.food);
        // rations are whatever the reserve does not cover, so a shortfall
        // eats into the reserve only once they are gone
        self.food_level = feed(registry, store, config.food_per_citizen);
        signals.reserve_drawn = self.settle_reserve(store);
        if signals.reserve_drawn > 0.0 {
            debug!(drawn = signals.reserve_drawn, left = self.strategic_reserve, "strategic reserve drawn");
        }
        signals.food_level = self.food_level;
        self.month_food_sum += self.food_level as f64;
        self.month_food_ticks += 1;

        pour_vodka(registry, store, config.vodka_per_dependent);

        self.heating = HeatingKind::for_settlement(inputs.buildings);
        signals.heating = tick_heating(
            self.heating,
            registry.len(),
            calendar.is_heating_season(),
            store,
        );
        if signals.heating.failing {
            for citizen in registry.iter_mut() {
                citizen.adjust_morale(-heating::COLD_MORALE_PENALTY);
            }
        }
        self.heating_failing = signals.heating.failing;

        self.quota
            .add_progress(inputs.production.gross_of(self.quota.resource));
        signals.quota = self
            .quota
            .evaluate(calendar.year(), self.doctrine, config.quota_years);

        if calendar.is_year_end() {
            let plan = self.trudodni.close_year();
            info!(?plan, "labour plan closed");
            signals.labour_plan = Some(plan);
        }

        signals
    }
}

/// Everyone eats; returns the fraction of demand met
fn feed(registry: &mut CitizenRegistry, store: &mut ResourceStore, per_citizen: f64) -> f32 {
    let demand = per_citizen * registry.len() as f64;
    let food_level = if demand <= 0.0 {
        1.0
    } else {
        let eaten = store.withdraw(ResourceKind::Food, demand, ShortageSource::Rations);
        (eaten / demand) as f32
    };

    let target = 100.0 * (1.0 - food_level);
    for citizen in registry.iter_mut() {
        let delta = (target - citizen.hunger) * HUNGER_RATE;
        citizen.adjust_hunger(delta);
        if food_level < 1.0 {
            citizen.adjust_morale(-HUNGER_MORALE_PENALTY);
        }
    }
    food_level
}

/// Dependent citizens drink; shortfall costs morale
fn pour_vodka(registry: &mut CitizenRegistry, store: &mut ResourceStore, per_dependent: f64) {
    let demand: f64 = registry
        .iter()
        .map(|c| c.vodka_dependency as f64 / 100.0 * per_dependent)
        .sum();
    if demand <= 0.0 {
        return;
    }
    let poured = store.withdraw(ResourceKind::Vodka, demand, ShortageSource::Vodka);
    if poured < demand {
        let missing = 1.0 - (poured / demand) as f32;
        for citizen in registry.iter_mut().filter(|c| c.vodka_dependency > 0.0) {
            citizen.adjust_morale(-VODKA_MORALE_PENALTY * missing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::citizen::{CitizenClass, Gender};

    fn village(people: u32) -> CitizenRegistry {
        let mut registry = CitizenRegistry::new();
        let dvor = registry.add_household("Dvor Kuznetsov".into(), 60.0);
        for i in 0..people {
            registry.spawn(dvor, format!("Citizen {}", i), CitizenClass::Farmer, 30, Gender::Female);
        }
        registry
    }

    fn run_tick(
        economy: &mut EconomySystem,
        calendar: &Calendar,
        production: &ProductionReport,
        registry: &mut CitizenRegistry,
        store: &mut ResourceStore,
    ) -> EconomySignals {
        let buildings = BuildingArchetype::new();
        economy.tick(
            EconomyInputs {
                calendar,
                production,
                buildings: &buildings,
                fondy_multiplier: 1.0,
            },
            registry,
            store,
            &EconomyConfig::default(),
            &WorkforceConfig::default(),
        )
    }

    #[test]
    fn test_starving_settlement_has_zero_food_level() {
        let mut economy = EconomySystem::new(&EconomyConfig::default(), 1917);
        let mut registry = village(10);
        let mut store = ResourceStore::new();
        let calendar = Calendar::new(1917);
        let signals = run_tick(
            &mut economy,
            &calendar,
            &ProductionReport::default(),
            &mut registry,
            &mut store,
        );
        assert_eq!(signals.food_level, 0.0);
        assert!(store.had_shortage(ResourceKind::Food));
        assert!(store.verify().is_ok());
        assert!(registry.iter().all(|c| c.hunger > 0.0));
    }

    #[test]
    fn test_fed_settlement_eats_from_stock() {
        let mut economy = EconomySystem::new(&EconomyConfig::default(), 1917);
        let mut registry = village(10);
        let mut store = ResourceStore::new();
        store.food = 50.0;
        let calendar = Calendar::new(1917);
        let signals = run_tick(
            &mut economy,
            &calendar,
            &ProductionReport::default(),
            &mut registry,
            &mut store,
        );
        assert_eq!(signals.food_level, 1.0);
        assert!((store.food - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_reserve_holds_while_rations_last() {
        let mut economy = EconomySystem::new(&EconomyConfig::default(), 1917);
        let mut registry = village(10);
        let mut store = ResourceStore::new();
        store.food = 100.0;
        let calendar = Calendar::new(1917);
        let mut harvest = ProductionReport::default();
        harvest.gross.insert(ResourceKind::Food, 40.0);
        run_tick(&mut economy, &calendar, &harvest, &mut registry, &mut store);
        let reserve = economy.strategic_reserve();
        assert!(reserve > 0.0);
        assert!(reserve <= store.food);

        store.food = reserve + 2.0;
        let signals = run_tick(
            &mut economy,
            &calendar,
            &ProductionReport::default(),
            &mut registry,
            &mut store,
        );
        assert_eq!(signals.reserve_drawn, 0.0);
        assert_eq!(economy.strategic_reserve(), reserve);
    }

    #[test]
    fn test_starving_tick_draws_the_reserve_down() {
        let mut economy = EconomySystem::new(&EconomyConfig::default(), 1917);
        let mut registry = village(10);
        let mut store = ResourceStore::new();
        store.food = 100.0;
        let calendar = Calendar::new(1917);
        let mut harvest = ProductionReport::default();
        harvest.gross.insert(ResourceKind::Food, 40.0);
        run_tick(&mut economy, &calendar, &harvest, &mut registry, &mut store);
        let reserve = economy.strategic_reserve();

        // half a ration left outside the reserve, ten citizens eat 1.0
        store.food = reserve + 0.5;
        let signals = run_tick(
            &mut economy,
            &calendar,
            &ProductionReport::default(),
            &mut registry,
            &mut store,
        );
        assert_eq!(signals.food_level, 1.0);
        assert!((signals.reserve_drawn - 0.5).abs() < 1e-9);
        assert!((economy.strategic_reserve() - (reserve - 0.5)).abs() < 1e-9);
        assert!((economy.strategic_reserve() - store.food).abs() < 1e-9);
    }

    #[test]
    fn test_doctrine_switch_is_immediate() {
        let mut economy = EconomySystem::new(&EconomyConfig::default(), 1940);
        assert_eq!(economy.doctrine(), Doctrine::Industrialization);
        let mut registry = village(1);
        let mut store = ResourceStore::new();
        let calendar = Calendar::new(1941);
        let signals = run_tick(
            &mut economy,
            &calendar,
            &ProductionReport::default(),
            &mut registry,
            &mut store,
        );
        assert_eq!(
            signals.doctrine_changed,
            Some((Doctrine::Industrialization, Doctrine::Wartime))
        );
        assert_eq!(economy.delivery_rates(), Doctrine::Wartime.delivery_rates());
    }

    #[test]
    fn test_winter_without_timber_fails_heating() {
        let mut economy = EconomySystem::new(&EconomyConfig::default(), 1917);
        let mut registry = village(5);
        let mut store = ResourceStore::new();
        store.food = 100.0;
        // tick 0 is January
        let calendar = Calendar::new(1917);
        let signals = run_tick(
            &mut economy,
            &calendar,
            &ProductionReport::default(),
            &mut registry,
            &mut store,
        );
        assert!(signals.heating.failing);
        assert!(economy.heating_failing());
    }

    #[test]
    fn test_monthly_food_level_averages() {
        let mut economy = EconomySystem::new(&EconomyConfig::default(), 1917);
        let mut registry = village(10);
        let mut store = ResourceStore::new();
        store.food = 1.0;
        let calendar = Calendar::new(1917);
        let production = ProductionReport::default();
        run_tick(&mut economy, &calendar, &production, &mut registry, &mut store);
        run_tick(&mut economy, &calendar, &production, &mut registry, &mut store);
        assert!((economy.take_monthly_food_level() - 0.5).abs() < 1e-6);
    }
}
