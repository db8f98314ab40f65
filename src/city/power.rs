//! Power grid
//!
//! Stations generate in proportion to staffing and health, burning their
//! recipe's fuel. Consumers are then powered in building id order until the
//! generated power runs out; a consumer that does not fit stays dark even if
//! a later, smaller one would.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::city::building::BuildingArchetype;
use crate::city::recipe::RecipeCatalog;
use crate::core::types::BuildingId;
use crate::economy::resources::{ResourceKind, ResourceStore, ShortageSource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerReport {
    pub generated: f64,
    pub used: f64,
    pub unpowered: Vec<BuildingId>,
}

impl PowerReport {
    pub fn has_station(&self) -> bool {
        self.generated > 0.0
    }
}

pub fn distribute_power(
    buildings: &mut BuildingArchetype,
    recipes: &RecipeCatalog,
    store: &mut ResourceStore,
) -> PowerReport {
    let mut report = PowerReport::default();

    for i in 0..buildings.count() {
        let building_type = buildings.building_types[i];
        let output = building_type.power_output();
        if output <= 0.0 {
            continue;
        }
        let cap = building_type.worker_capacity().max(1) as f64;
        let staffed = (buildings.workers[i].len() as f64).min(cap);
        let staffing = staffed / cap;
        let fuel = match recipes.get(building_type) {
            Some(recipe) => store.draw_inputs(&recipe.inputs, staffed, ShortageSource::Production),
            None => 1.0,
        };
        report.generated += output * staffing * (buildings.health[i] as f64 / 100.0) * fuel;
    }

    let mut order: Vec<usize> = (0..buildings.count()).collect();
    order.sort_by_key(|i| buildings.ids[*i]);

    let mut remaining = report.generated;
    for i in order {
        let demand = buildings.building_types[i].power_demand();
        if demand <= 0.0 {
            buildings.powered[i] = true;
            continue;
        }
        if demand <= remaining {
            remaining -= demand;
            report.used += demand;
            buildings.powered[i] = true;
        } else {
            buildings.powered[i] = false;
            report.unpowered.push(buildings.ids[i]);
        }
    }

    if !report.unpowered.is_empty() {
        debug!(count = report.unpowered.len(), "buildings without power");
    }
    store.set(ResourceKind::PowerGenerated, report.generated);
    store.set(ResourceKind::PowerUsed, report.used);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::BuildingType;
    use crate::core::types::{CitizenId, GridPos};

    fn grid(types: &[BuildingType]) -> BuildingArchetype {
        let mut b = BuildingArchetype::new();
        for (i, t) in types.iter().enumerate() {
            b.spawn(BuildingId(i as u32 + 1), *t, GridPos::new(i as u32, 0), 0);
        }
        b
    }

    #[test]
    fn test_no_station_leaves_consumers_dark() {
        let mut b = grid(&[BuildingType::Factory, BuildingType::KolkhozFarm]);
        let mut store = ResourceStore::new();
        let report = distribute_power(&mut b, &RecipeCatalog::with_defaults(), &mut store);
        assert_eq!(report.generated, 0.0);
        assert!(!b.powered[0]);
        assert!(b.powered[1]);
        assert_eq!(report.unpowered, vec![BuildingId(1)]);
    }

    #[test]
    fn test_consumers_powered_in_id_order() {
        let mut b = grid(&[
            BuildingType::PowerStation,
            BuildingType::SteelMill,
            BuildingType::SteelMill,
            BuildingType::SteelMill,
            BuildingType::School,
        ]);
        for c in 0..6 {
            b.workers[0].push(CitizenId(100 + c));
        }
        let mut store = ResourceStore::new();
        store.timber = 100.0;

        let report = distribute_power(&mut b, &RecipeCatalog::with_defaults(), &mut store);
        assert_eq!(report.generated, 60.0);
        // three mills take 60, the school gets nothing
        assert!(b.powered[1] && b.powered[2] && b.powered[3]);
        assert!(!b.powered[4]);
        assert_eq!(report.used, 60.0);
        assert!((store.timber - (100.0 - 1.2)).abs() < 1e-9);
        assert_eq!(store.power_generated, 60.0);
    }

    #[test]
    fn test_station_without_fuel_generates_nothing() {
        let mut b = grid(&[BuildingType::PowerStation, BuildingType::School]);
        b.workers[0].push(CitizenId(1));
        let mut store = ResourceStore::new();
        let report = distribute_power(&mut b, &RecipeCatalog::with_defaults(), &mut store);
        assert_eq!(report.generated, 0.0);
        assert!(store.had_shortage(ResourceKind::Timber));
        assert!(!b.powered[1]);
    }
}
