//! Households (dvory) and the monthly loyalty subsystem
//!
//! A dvor's loyalty to the collective moves with food sufficiency. Very
//! disloyal households may sabotage a workplace or flee the settlement.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{clamp_gauge, CitizenId, DvorId};

/// Monthly loyalty change when the settlement had no food at all
pub const LOYALTY_LOSS_STARVATION: f32 = 0.8;
/// Monthly loyalty change when rations fell short
pub const LOYALTY_LOSS_HUNGRY: f32 = 0.3;
/// Monthly loyalty change when everyone ate
pub const LOYALTY_GAIN_FED: f32 = 0.5;
/// Below this loyalty a household may sabotage
pub const SABOTAGE_THRESHOLD: f32 = 25.0;
/// Below this loyalty a household may flee
pub const FLIGHT_THRESHOLD: f32 = 10.0;

const MAX_SABOTAGE_CHANCE: f32 = 0.3;
const MAX_FLIGHT_CHANCE: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dvor {
    pub id: DvorId,
    pub name: String,
    pub members: Vec<CitizenId>,
    /// 0-100, always clamped
    pub loyalty_to_collective: f32,
}

impl Dvor {
    pub fn new(id: DvorId, name: String, loyalty: f32) -> Self {
        Self {
            id,
            name,
            members: Vec::new(),
            loyalty_to_collective: clamp_gauge(loyalty),
        }
    }

    pub fn adjust_loyalty(&mut self, delta: f32) {
        self.loyalty_to_collective = clamp_gauge(self.loyalty_to_collective + delta);
    }
}

/// Loyalty delta for a month given the food level (fraction of demand met)
pub fn loyalty_delta(food_level: f32) -> f32 {
    if food_level <= 0.0 {
        -LOYALTY_LOSS_STARVATION
    } else if food_level < 1.0 {
        -LOYALTY_LOSS_HUNGRY
    } else {
        LOYALTY_GAIN_FED
    }
}

/// Apply the monthly food-driven loyalty change to every household
pub fn apply_food_loyalty(dvory: &mut BTreeMap<DvorId, Dvor>, food_level: f32) {
    let delta = loyalty_delta(food_level);
    for dvor in dvory.values_mut() {
        dvor.adjust_loyalty(delta);
    }
}

/// Result of the unrest roll for a single household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unrest {
    Sabotage(DvorId),
    Flight(DvorId),
}

/// Roll sabotage and flight checks for disloyal households.
///
/// Chances scale linearly from zero at the threshold to their maximum at
/// zero loyalty. A household that flees does not also sabotage.
pub fn roll_unrest<R: Rng + ?Sized>(dvory: &BTreeMap<DvorId, Dvor>, rng: &mut R) -> Vec<Unrest> {
    let mut outcomes = Vec::new();
    for dvor in dvory.values() {
        let loyalty = dvor.loyalty_to_collective;
        if loyalty < FLIGHT_THRESHOLD {
            let chance = (FLIGHT_THRESHOLD - loyalty) / FLIGHT_THRESHOLD * MAX_FLIGHT_CHANCE;
            if rng.gen::<f32>() < chance {
                outcomes.push(Unrest::Flight(dvor.id));
                continue;
            }
        }
        if loyalty < SABOTAGE_THRESHOLD {
            let chance = (SABOTAGE_THRESHOLD - loyalty) / SABOTAGE_THRESHOLD * MAX_SABOTAGE_CHANCE;
            if rng.gen::<f32>() < chance {
                outcomes.push(Unrest::Sabotage(dvor.id));
            }
        }
    }
    outcomes
}
