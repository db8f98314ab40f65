//! Era building mandates
//!
//! Each doctrine orders a handful of buildings. The order is checked once,
//! when the era closes.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::city::building::{BuildingArchetype, BuildingRole};
use crate::economy::doctrine::Doctrine;

pub const FULFILLED_COMMENDATION: f64 = 0.5;
pub const UNFULFILLED_MARK: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mandate {
    pub role: BuildingRole,
    pub count: u32,
}

const fn mandate(role: BuildingRole, count: u32) -> Mandate {
    Mandate { role, count }
}

const REVOLUTIONARY: &[Mandate] = &[
    mandate(BuildingRole::Agriculture, 2),
    mandate(BuildingRole::Housing, 4),
];
const INDUSTRIALIZATION: &[Mandate] = &[
    mandate(BuildingRole::Industry, 2),
    mandate(BuildingRole::Power, 1),
];
const WARTIME: &[Mandate] = &[
    mandate(BuildingRole::Military, 1),
    mandate(BuildingRole::Agriculture, 3),
];
const RECONSTRUCTION: &[Mandate] = &[
    mandate(BuildingRole::Housing, 8),
    mandate(BuildingRole::Construction, 2),
];
const THAW: &[Mandate] = &[
    mandate(BuildingRole::Culture, 1),
    mandate(BuildingRole::Education, 1),
];
const FREEZE: &[Mandate] = &[
    mandate(BuildingRole::Administration, 1),
    mandate(BuildingRole::Industry, 3),
];
const STAGNATION: &[Mandate] = &[
    mandate(BuildingRole::Medical, 1),
    mandate(BuildingRole::Housing, 12),
];
const ETERNAL: &[Mandate] = &[
    mandate(BuildingRole::Administration, 2),
    mandate(BuildingRole::Culture, 2),
];

pub fn mandates_for(doctrine: Doctrine) -> &'static [Mandate] {
    match doctrine {
        Doctrine::Revolutionary => REVOLUTIONARY,
        Doctrine::Industrialization => INDUSTRIALIZATION,
        Doctrine::Wartime => WARTIME,
        Doctrine::Reconstruction => RECONSTRUCTION,
        Doctrine::Thaw => THAW,
        Doctrine::Freeze => FREEZE,
        Doctrine::Stagnation => STAGNATION,
        Doctrine::Eternal => ETERNAL,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandateProgress {
    pub mandate: Mandate,
    pub built: u32,
}

impl MandateProgress {
    pub fn is_fulfilled(&self) -> bool {
        self.built >= self.mandate.count
    }
}

/// Outcome of an era's mandates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MandateVerdict {
    pub fulfilled: u32,
    pub unfulfilled: u32,
}

impl MandateVerdict {
    pub fn commendation(&self) -> f64 {
        self.fulfilled as f64 * FULFILLED_COMMENDATION
    }

    pub fn marks(&self) -> f64 {
        self.unfulfilled as f64 * UNFULFILLED_MARK
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandateState {
    doctrine: Doctrine,
}

impl MandateState {
    pub fn new(doctrine: Doctrine) -> Self {
        Self { doctrine }
    }

    pub fn doctrine(&self) -> Doctrine {
        self.doctrine
    }

    pub fn mandates(&self) -> &'static [Mandate] {
        mandates_for(self.doctrine)
    }

    pub fn progress(&self, buildings: &BuildingArchetype) -> Vec<MandateProgress> {
        self.mandates()
            .iter()
            .map(|m| MandateProgress {
                mandate: *m,
                built: buildings.count_role(m.role) as u32,
            })
            .collect()
    }

    /// Judge the closing era and take on the next era's mandates
    pub fn close_era(&mut self, buildings: &BuildingArchetype, next: Doctrine) -> MandateVerdict {
        let mut verdict = MandateVerdict::default();
        for progress in self.progress(buildings) {
            if progress.is_fulfilled() {
                verdict.fulfilled += 1;
            } else {
                verdict.unfulfilled += 1;
            }
        }
        info!(
            era = self.doctrine.name(),
            fulfilled = verdict.fulfilled,
            unfulfilled = verdict.unfulfilled,
            "era mandates judged"
        );
        self.doctrine = next;
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::BuildingType;
    use crate::core::types::{BuildingId, GridPos};

    #[test]
    fn test_every_era_has_mandates() {
        for doctrine in Doctrine::ALL {
            assert!(!mandates_for(doctrine).is_empty());
        }
    }

    #[test]
    fn test_close_era_counts_fulfilled() {
        let mut buildings = BuildingArchetype::new();
        buildings.spawn(BuildingId(1), BuildingType::KolkhozFarm, GridPos::new(0, 0), 0);
        buildings.spawn(BuildingId(2), BuildingType::KolkhozFarm, GridPos::new(1, 0), 0);
        buildings.spawn(BuildingId(3), BuildingType::Izba, GridPos::new(2, 0), 0);

        let mut state = MandateState::new(Doctrine::Revolutionary);
        let progress = state.progress(&buildings);
        assert!(progress[0].is_fulfilled());
        assert_eq!(progress[1].built, 1);

        let verdict = state.close_era(&buildings, Doctrine::Industrialization);
        assert_eq!(verdict, MandateVerdict { fulfilled: 1, unfulfilled: 1 });
        assert_eq!(verdict.commendation(), 0.5);
        assert_eq!(verdict.marks(), 1.0);
        assert_eq!(state.doctrine(), Doctrine::Industrialization);
    }
}
