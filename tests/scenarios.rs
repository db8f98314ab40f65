//! End-to-end scenarios for the starvation, staffing, tier, arrest and
//! doctrine rules

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sim_soviet::city::building::{BuildingArchetype, BuildingType};
use sim_soviet::city::production::ProductionReport;
use sim_soviet::city::terrain::{TerrainGrid, TerrainKind};
use sim_soviet::core::config::{SimulationConfig, WorkforceConfig};
use sim_soviet::core::types::{BuildingId, GridPos};
use sim_soviet::economy::deliveries::collect_deliveries;
use sim_soviet::economy::doctrine::Doctrine;
use sim_soviet::economy::resources::{ResourceKind, ResourceStore};
use sim_soviet::political::{PersonnelFile, ThreatLevel};
use sim_soviet::population::dvor::{apply_food_loyalty, LOYALTY_LOSS_STARVATION};
use sim_soviet::population::registry::CitizenRegistry;
use sim_soviet::settlement::{default_tiers, SettlementMetrics, SettlementSystem, SettlementTier};
use sim_soviet::simulation::SimulationWorld;
use sim_soviet::workforce::efficiency::EfficiencyReason;
use sim_soviet::workforce::governor::compute_staffing;

#[test]
fn scenario_starvation_costs_every_household_loyalty() {
    let mut registry = CitizenRegistry::new();
    let loyal = registry.add_household("Petrov".into(), 60.0);
    let wavering = registry.add_household("Ivanov".into(), 0.5);

    let mut store = ResourceStore::new();
    store.set(ResourceKind::Food, 0.0);
    apply_food_loyalty(registry.households_mut(), 0.0);

    let loyal = registry.household(loyal).unwrap().loyalty_to_collective;
    assert!((loyal - (60.0 - LOYALTY_LOSS_STARVATION)).abs() < 1e-5);
    assert_eq!(registry.household(wavering).unwrap().loyalty_to_collective, 0.0);
    assert_eq!(store.get(ResourceKind::Food), 0.0);
}

#[test]
fn scenario_empty_workplace_reports_no_workers() {
    let mut buildings = BuildingArchetype::new();
    buildings.spawn(BuildingId(1), BuildingType::KolkhozFarm, GridPos::new(0, 0), 0);
    assert_eq!(BuildingType::KolkhozFarm.worker_capacity(), 10);
    assert_eq!(buildings.health[0], 100.0);
    assert!(buildings.powered[0]);

    let mut registry = CitizenRegistry::new();
    let staffing = compute_staffing(&buildings, &mut registry, &WorkforceConfig::default());
    assert_eq!(staffing.len(), 1);
    assert_eq!(staffing[0].raw_workers, 0);
    assert_eq!(staffing[0].efficiency.percent, 0.0);
    assert_eq!(staffing[0].efficiency.reason, Some(EfficiencyReason::NoWorkers));
    assert_eq!(
        staffing[0].efficiency.reason.map(|r| r.label()),
        Some("No workers assigned")
    );
}

#[test]
fn scenario_short_population_spike_does_not_promote() {
    let tiers = default_tiers();
    let posyolok = &tiers[SettlementTier::Posyolok.index()];
    let qualifying = SettlementMetrics {
        population: posyolok.population + 10,
        non_agricultural_percent: 100.0,
        roles: posyolok.required_roles.iter().copied().collect::<BTreeSet<_>>(),
    };
    let collapsed = SettlementMetrics {
        population: 10,
        ..qualifying.clone()
    };

    let mut settlement = SettlementSystem::new();
    for _ in 0..posyolok.promotion_ticks - 1 {
        assert_eq!(settlement.evaluate(&qualifying, &tiers), None);
    }
    assert_eq!(settlement.promotion_counter(), posyolok.promotion_ticks - 1);
    assert_eq!(settlement.evaluate(&collapsed, &tiers), None);
    assert_eq!(settlement.tier(), SettlementTier::Selo);
    assert_eq!(settlement.promotion_counter(), 0);
}

#[test]
fn scenario_seventh_mark_arrests_exactly_once() {
    let mut file = PersonnelFile::new(u64::MAX);
    for _ in 0..6 {
        file.add_mark(1.0, 0, "sloppy paperwork");
    }
    assert_eq!(file.effective_marks(0), 6.0);
    assert_eq!(file.threat(0), ThreatLevel::Reviewed);
    assert!(!file.check_arrest(0));

    file.add_mark(1.0, 1, "unexplained absence");
    assert_eq!(file.threat(1), ThreatLevel::Arrested);
    assert!(file.check_arrest(1));
    assert!(!file.check_arrest(2));
    assert!(!file.check_arrest(3));
    assert!(file.is_arrested());
}

#[test]
fn scenario_wartime_rates_apply_from_the_first_tick() {
    let config = SimulationConfig {
        start_year: 1940,
        ..SimulationConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1941);
    let mut world =
        SimulationWorld::new(config, TerrainGrid::filled(12, 12, TerrainKind::Plains), &mut rng).unwrap();
    assert_eq!(world.economy().doctrine(), Doctrine::Industrialization);

    let mut transition = None;
    for _ in 0..400 {
        let report = world.tick(&mut rng).unwrap();
        if let Some(change) = report.economy.doctrine_changed {
            transition = Some(change);
            break;
        }
    }
    assert_eq!(transition, Some((Doctrine::Industrialization, Doctrine::Wartime)));
    assert_eq!(world.economy().delivery_rates(), Doctrine::Wartime.delivery_rates());

    // the transition tick itself is taxed at the wartime table
    let mut production = ProductionReport::default();
    production.gross.insert(ResourceKind::Food, 100.0);
    let mut store = ResourceStore::new();
    store.set(ResourceKind::Food, 1000.0);
    let report = collect_deliveries(world.economy().delivery_rates(), &production, &mut store);
    let wartime = Doctrine::Wartime.delivery_rates();
    assert!((report.delivered(ResourceKind::Food) - 100.0 * wartime.food as f64).abs() < 1e-9);
}
