//! Settlement tier state machine with hysteresis
//!
//! Promotion needs the next tier's requirements to hold for that tier's
//! `promotion_ticks` consecutive ticks; demotion needs the current tier's
//! requirements to fail for its `demotion_ticks`. Each counter resets to zero
//! the moment its condition breaks, so no partial credit survives a gap.

pub mod tier;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use tier::{default_tiers, validate_tiers, SettlementMetrics, SettlementTier, TierDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierChange {
    pub from: SettlementTier,
    pub to: SettlementTier,
}

impl TierChange {
    pub fn is_promotion(&self) -> bool {
        self.to > self.from
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementSystem {
    tier: SettlementTier,
    promotion_counter: u32,
    demotion_counter: u32,
}

impl SettlementSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(&self) -> SettlementTier {
        self.tier
    }

    pub fn promotion_counter(&self) -> u32 {
        self.promotion_counter
    }

    pub fn demotion_counter(&self) -> u32 {
        self.demotion_counter
    }

    /// Evaluate one tick. `tiers` must have passed `validate_tiers`.
    pub fn evaluate(
        &mut self,
        metrics: &SettlementMetrics,
        tiers: &[TierDefinition],
    ) -> Option<TierChange> {
        let current = tiers.get(self.tier.index())?;

        let next = self.tier.next().and_then(|t| tiers.get(t.index()));
        match next {
            Some(def) if def.is_met(metrics) => {
                self.promotion_counter += 1;
                if self.promotion_counter >= def.promotion_ticks {
                    return Some(self.change_to(def.tier));
                }
            }
            _ => self.promotion_counter = 0,
        }

        if self.tier.prev().is_some() && !current.is_met(metrics) {
            self.demotion_counter += 1;
            if self.demotion_counter >= current.demotion_ticks {
                if let Some(lower) = self.tier.prev() {
                    return Some(self.change_to(lower));
                }
            }
        } else {
            self.demotion_counter = 0;
        }

        None
    }

    fn change_to(&mut self, to: SettlementTier) -> TierChange {
        let change = TierChange { from: self.tier, to };
        self.tier = to;
        self.promotion_counter = 0;
        self.demotion_counter = 0;
        if change.is_promotion() {
            info!(from = change.from.name(), to = to.name(), "settlement promoted");
        } else {
            info!(from = change.from.name(), to = to.name(), "settlement demoted");
        }
        change
    }
}
