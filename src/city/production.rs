//! Production system - turns staffed buildings into resources each tick
//!
//! For every building with a recipe that produces something:
//! - Scale = effective workers x operating factor x mean worker contribution
//! - Inputs are drawn at that scale (a short input scales the whole cycle down)
//! - Outputs are added to the store and to the tick's gross production

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::city::building::BuildingArchetype;
use crate::city::recipe::RecipeCatalog;
use crate::core::types::BuildingId;
use crate::economy::resources::{ResourceKind, ResourceStore, ShortageSource};
use crate::workforce::governor::StaffingReport;

/// Output of one production pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionReport {
    /// Gross output by resource, before deliveries
    pub gross: BTreeMap<ResourceKind, f64>,
    /// Buildings whose inputs were short this tick
    pub starved: Vec<BuildingId>,
}

impl ProductionReport {
    pub fn gross_of(&self, kind: ResourceKind) -> f64 {
        self.gross.get(&kind).copied().unwrap_or(0.0)
    }
}

/// Process production for all staffed buildings
pub fn tick_production(
    buildings: &BuildingArchetype,
    staffing: &[StaffingReport],
    recipes: &RecipeCatalog,
    store: &mut ResourceStore,
) -> ProductionReport {
    let mut report = ProductionReport::default();

    for staff in staffing {
        let Some(index) = buildings.index_of(staff.building) else {
            continue;
        };
        let Some(recipe) = recipes.get(buildings.building_types[index]) else {
            continue;
        };
        // Power stations burn fuel in the grid pass
        if recipe.outputs.is_empty() {
            continue;
        }

        let scale = staff.effective_workers as f64
            * staff.operating as f64
            * staff.mean_contribution as f64;
        if scale <= 0.0 {
            continue;
        }

        let fraction = store.draw_inputs(&recipe.inputs, scale, ShortageSource::Production);
        if fraction < 1.0 {
            report.starved.push(staff.building);
        }
        for (kind, per_worker) in &recipe.outputs {
            let amount = per_worker * scale * fraction;
            store.add(*kind, amount);
            *report.gross.entry(*kind).or_insert(0.0) += amount;
        }
    }

    report
}
