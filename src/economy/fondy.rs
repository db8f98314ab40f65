//! Fondy - monthly central material allocations
//!
//! Allocations are fixed per resource and scaled by settlement tier. What
//! actually arrives is the allocation times the supply-chain reliability.
//! Reliability wears down while the state squeezes deliveries hard and
//! recovers slowly when deliveries are light.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::config::EconomyConfig;
use crate::economy::resources::{ResourceKind, ResourceStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FondyDelivery {
    pub delivered: BTreeMap<ResourceKind, f64>,
    pub undelivered: BTreeMap<ResourceKind, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FondySystem {
    reliability: f32,
    /// Allocation that never arrived, summed over all months
    undelivered_total: BTreeMap<ResourceKind, f64>,
}

impl FondySystem {
    pub fn new(start_reliability: f32) -> Self {
        Self {
            reliability: start_reliability.clamp(0.0, 1.0),
            undelivered_total: BTreeMap::new(),
        }
    }

    pub fn reliability(&self) -> f32 {
        self.reliability
    }

    pub fn undelivered_total(&self) -> &BTreeMap<ResourceKind, f64> {
        &self.undelivered_total
    }

    /// Per-tick drift of reliability given the active food delivery rate
    pub fn update_reliability(&mut self, food_delivery_rate: f32, config: &EconomyConfig) {
        if food_delivery_rate >= config.heavy_delivery_rate {
            self.reliability -= config.fondy_degrade_rate;
        } else if food_delivery_rate <= config.light_delivery_rate {
            self.reliability += config.fondy_recover_rate;
        }
        self.reliability = self.reliability.clamp(0.0, 1.0);
    }

    /// Monthly allocation before reliability
    pub fn allocation(config: &EconomyConfig, tier_multiplier: f64) -> [(ResourceKind, f64); 4] {
        [
            (ResourceKind::Timber, config.fondy_timber * tier_multiplier),
            (ResourceKind::Steel, config.fondy_steel * tier_multiplier),
            (ResourceKind::Cement, config.fondy_cement * tier_multiplier),
            (ResourceKind::Prefab, config.fondy_prefab * tier_multiplier),
        ]
    }

    /// Deliver this month's allocation into the store
    pub fn deliver(
        &mut self,
        config: &EconomyConfig,
        tier_multiplier: f64,
        store: &mut ResourceStore,
    ) -> FondyDelivery {
        let mut result = FondyDelivery::default();
        let reliability = self.reliability as f64;
        for (kind, allocated) in Self::allocation(config, tier_multiplier) {
            let arrived = allocated * reliability;
            let missing = allocated - arrived;
            store.add(kind, arrived);
            result.delivered.insert(kind, arrived);
            result.undelivered.insert(kind, missing);
            *self.undelivered_total.entry(kind).or_insert(0.0) += missing;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reliability_degrades_under_heavy_rates() {
        let config = EconomyConfig::default();
        let mut fondy = FondySystem::new(0.8);
        for _ in 0..100 {
            fondy.update_reliability(0.6, &config);
        }
        assert!((fondy.reliability() - 0.6).abs() < 1e-4);

        for _ in 0..1000 {
            fondy.update_reliability(0.6, &config);
        }
        assert_eq!(fondy.reliability(), 0.0);
    }

    #[test]
    fn test_reliability_recovers_under_light_rates() {
        let config = EconomyConfig::default();
        let mut fondy = FondySystem::new(0.5);
        for _ in 0..200 {
            fondy.update_reliability(0.25, &config);
        }
        assert!((fondy.reliability() - 0.6).abs() < 1e-4);

        // between the two thresholds nothing changes
        fondy.update_reliability(0.4, &config);
        assert!((fondy.reliability() - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_delivery_scaled_by_tier_and_reliability() {
        let config = EconomyConfig::default();
        let mut fondy = FondySystem::new(0.5);
        let mut store = ResourceStore::new();
        let delivery = fondy.deliver(&config, 2.0, &mut store);
        assert_eq!(store.timber, 40.0);
        assert_eq!(store.steel, 10.0);
        assert_eq!(delivery.undelivered[&ResourceKind::Cement], 20.0);
        assert_eq!(fondy.undelivered_total()[&ResourceKind::Prefab], 5.0);
    }
}
