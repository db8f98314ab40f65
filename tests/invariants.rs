//! Properties that must hold on every tick

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sim_soviet::city::building::BuildingType;
use sim_soviet::city::terrain::{TerrainGrid, TerrainKind};
use sim_soviet::core::config::SimulationConfig;
use sim_soviet::core::types::GridPos;
use sim_soviet::economy::resources::ResourceKind;
use sim_soviet::political::PersonnelFile;
use sim_soviet::settlement::{default_tiers, SettlementMetrics, SettlementSystem, SettlementTier};
use sim_soviet::simulation::{SimCommand, SimulationWorld};
use sim_soviet::workforce::focus::CollectiveFocus;

fn founded(seed: u64, start_year: u32) -> (SimulationWorld, ChaCha8Rng) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let config = SimulationConfig {
        start_year,
        ..SimulationConfig::default()
    };
    let world = SimulationWorld::new(config, TerrainGrid::filled(16, 16, TerrainKind::Plains), &mut rng).unwrap();
    (world, rng)
}

fn command_strategy() -> impl Strategy<Value = SimCommand> {
    prop_oneof![
        prop_oneof![
            Just(CollectiveFocus::Food),
            Just(CollectiveFocus::Construction),
            Just(CollectiveFocus::Production),
            Just(CollectiveFocus::Balanced),
        ]
        .prop_map(SimCommand::SetCollectiveFocus),
        (0u32..20, 0u32..20).prop_map(|(x, y)| SimCommand::PlaceBuilding {
            building_type: BuildingType::Izba,
            position: GridPos::new(x, y),
        }),
        (0.0f64..200.0).prop_map(|amount| SimCommand::BlackMarketPurchase {
            resource: ResourceKind::Food,
            amount,
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn resources_never_negative(
        seed in any::<u64>(),
        start_year in prop_oneof![Just(1917u32), Just(1940u32), Just(1955u32)],
        commands in prop::collection::vec((0u64..150, command_strategy()), 0..12),
    ) {
        let (mut world, mut rng) = founded(seed, start_year);
        for tick in 0..150u64 {
            for (_, command) in commands.iter().filter(|(at, _)| *at == tick) {
                world.submit(command.clone());
            }
            if world.tick(&mut rng).is_err() {
                break;
            }
            for kind in ResourceKind::ALL {
                let value = world.resources().get(kind);
                prop_assert!(value.is_finite() && value >= 0.0, "{:?} = {}", kind, value);
            }
        }
    }

    #[test]
    fn marks_only_fall_by_commendation_or_time(
        ops in prop::collection::vec((0u8..3, 0.1f64..3.0, 0u64..50), 1..40),
    ) {
        let mut file = PersonnelFile::new(30);
        let mut now = 0u64;
        for (op, magnitude, wait) in ops {
            let before = file.effective_marks(now);
            match op {
                0 => {
                    file.add_mark(magnitude, now, "mark");
                    prop_assert!(file.effective_marks(now) >= before);
                }
                1 => {
                    file.add_commendation(magnitude, now, "commendation");
                    prop_assert!(file.effective_marks(now) <= before);
                }
                _ => {
                    let later = now + wait;
                    prop_assert!(file.effective_marks(later) <= before);
                    now = later;
                }
            }
        }
    }
}

#[test]
fn world_marks_fall_only_with_commendations() {
    let (mut world, mut rng) = founded(77, 1941);
    for _ in 0..720 {
        let file_before = world.political().personnel().clone();
        let now = world.current_tick();
        if world.tick(&mut rng).is_err() {
            break;
        }
        let file_after = world.political().personnel();
        assert!(file_after.black_marks() >= file_before.black_marks());
        if file_after.commendations() == file_before.commendations() {
            assert!(file_after.effective_marks(now + 1) >= file_before.effective_marks(now + 1));
        }
    }
}

#[test]
fn tier_changes_only_after_full_hysteresis() {
    let tiers = default_tiers();
    let posyolok = &tiers[SettlementTier::Posyolok.index()];
    let good = SettlementMetrics {
        population: posyolok.population,
        non_agricultural_percent: posyolok.non_agricultural_percent,
        roles: posyolok.required_roles.iter().copied().collect(),
    };
    let empty = SettlementMetrics::default();

    let mut settlement = SettlementSystem::new();
    for _ in 0..posyolok.promotion_ticks - 1 {
        settlement.evaluate(&good, &tiers);
    }
    // one tick at zero population wipes the progress
    assert_eq!(settlement.evaluate(&empty, &tiers), None);
    assert_eq!(settlement.promotion_counter(), 0);
    for _ in 0..posyolok.promotion_ticks - 1 {
        assert_eq!(settlement.evaluate(&good, &tiers), None);
    }
    let change = settlement.evaluate(&good, &tiers).unwrap();
    assert_eq!(change.to, SettlementTier::Posyolok);
    assert_eq!(settlement.tier(), SettlementTier::Posyolok);
}

#[test]
fn tier_in_a_running_world_follows_hysteresis() {
    let (mut world, mut rng) = founded(5, 1917);
    let mut tier = world.settlement().tier();
    for _ in 0..360 {
        let Ok(report) = world.tick(&mut rng) else { break };
        match report.tier_change {
            Some(change) => {
                assert_eq!(change.from, tier);
                tier = change.to;
            }
            None => assert_eq!(world.settlement().tier(), tier),
        }
    }
}

#[test]
fn strategic_reserve_never_exceeds_food_in_store() {
    let (mut world, mut rng) = founded(3, 1917);
    for _ in 0..720 {
        if world.tick(&mut rng).is_err() {
            break;
        }
        let reserve = world.economy().strategic_reserve();
        let food = world.resources().food;
        assert!(reserve >= 0.0 && reserve <= food + 1e-9, "reserve {} > food {}", reserve, food);
    }
}
