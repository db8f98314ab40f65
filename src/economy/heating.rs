//! Heating - fuel burned through the cold months

use serde::{Deserialize, Serialize};

use crate::city::building::{BuildingArchetype, BuildingRole};
use crate::economy::resources::{ResourceKind, ResourceStore, ShortageSource};

/// Health below which a district network counts as crumbling
pub const CRUMBLING_HEALTH: f32 = 50.0;

/// Morale lost per citizen per tick while heating fails
pub const COLD_MORALE_PENALTY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeatingKind {
    /// Household stoves
    #[default]
    Pechka,
    /// District heating fed by a power station
    District,
    /// District heating with decayed pipes
    Crumbling,
}

impl HeatingKind {
    pub fn for_settlement(buildings: &BuildingArchetype) -> Self {
        if !buildings.has_role(BuildingRole::Power) {
            HeatingKind::Pechka
        } else if buildings.average_health() >= CRUMBLING_HEALTH {
            HeatingKind::District
        } else {
            HeatingKind::Crumbling
        }
    }

    /// Timber per citizen per tick
    pub fn fuel_per_citizen(&self) -> f64 {
        match self {
            HeatingKind::Pechka => 0.03,
            HeatingKind::District => 0.02,
            HeatingKind::Crumbling => 0.035,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HeatingKind::Pechka => "pechka",
            HeatingKind::District => "district",
            HeatingKind::Crumbling => "crumbling",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatingReport {
    pub kind: HeatingKind,
    pub required: f64,
    pub burned: f64,
    pub failing: bool,
}

/// Burn this tick's fuel; outside the heating season nothing is needed
pub fn tick_heating(
    kind: HeatingKind,
    population: usize,
    in_season: bool,
    store: &mut ResourceStore,
) -> HeatingReport {
    if !in_season || population == 0 {
        return HeatingReport {
            kind,
            ..Default::default()
        };
    }
    let required = kind.fuel_per_citizen() * population as f64;
    let burned = store.withdraw(ResourceKind::Timber, required, ShortageSource::Heating);
    HeatingReport {
        kind,
        required,
        burned,
        failing: burned < required,
    }
}
