//! Blat - informal connections and the black market
//!
//! The blat gauge rises with every black-market deal and slowly decays.
//! Detection risk is stepped by how many deals were made this session; each
//! deal rolls once against its tier's probability.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::EconomyConfig;
use crate::core::types::clamp_gauge;
use crate::economy::resources::{ResourceKind, ResourceStore, ShortageSource};

/// Detection risk tier, from in-session transaction count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlatRisk {
    Low,
    Moderate,
    Dangerous,
    Critical,
}

impl BlatRisk {
    /// Tier for a deal made after `prior` deals this session
    pub fn from_transactions(prior: u32) -> Self {
        match prior {
            0..=2 => BlatRisk::Low,
            3..=4 => BlatRisk::Moderate,
            5..=7 => BlatRisk::Dangerous,
            _ => BlatRisk::Critical,
        }
    }

    pub fn detection_chance(&self) -> f32 {
        match self {
            BlatRisk::Low => 0.05,
            BlatRisk::Moderate => 0.15,
            BlatRisk::Dangerous => 0.35,
            BlatRisk::Critical => 0.60,
        }
    }
}

/// Black-market price per unit; None for goods that are not for sale
pub fn black_market_price(kind: ResourceKind) -> Option<f64> {
    match kind {
        ResourceKind::Food => Some(2.0),
        ResourceKind::Timber => Some(1.5),
        ResourceKind::Steel => Some(4.0),
        ResourceKind::Cement => Some(3.0),
        ResourceKind::Prefab => Some(6.0),
        ResourceKind::Vodka => Some(5.0),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PurchaseOutcome {
    /// Not for sale, non-positive amount, or not enough money
    Rejected,
    Completed { risk: BlatRisk, detected: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlatSystem {
    level: f32,
    transactions: u32,
}

impl BlatSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn transactions(&self) -> u32 {
        self.transactions
    }

    /// Risk the next deal would run
    pub fn current_risk(&self) -> BlatRisk {
        BlatRisk::from_transactions(self.transactions)
    }

    pub fn decay(&mut self, config: &EconomyConfig) {
        self.level = clamp_gauge(self.level - config.blat_decay);
    }

    pub fn purchase<R: Rng + ?Sized>(
        &mut self,
        kind: ResourceKind,
        amount: f64,
        store: &mut ResourceStore,
        config: &EconomyConfig,
        rng: &mut R,
    ) -> PurchaseOutcome {
        let Some(price) = black_market_price(kind) else {
            return PurchaseOutcome::Rejected;
        };
        let cost = price * amount;
        if amount <= 0.0 || !cost.is_finite() || store.money < cost {
            debug!(resource = kind.label(), amount, cost, "black market purchase rejected");
            return PurchaseOutcome::Rejected;
        }

        store.withdraw(ResourceKind::Money, cost, ShortageSource::Event);
        store.add(kind, amount);

        let risk = self.current_risk();
        self.transactions += 1;
        self.level = clamp_gauge(self.level + config.blat_per_transaction);
        let detected = rng.gen::<f32>() < risk.detection_chance();
        PurchaseOutcome::Completed { risk, detected }
    }
}
