//! Resource store - the settlement-wide ledger of stock quantities
//!
//! No quantity may be negative after a system runs. Withdrawals clamp at
//! zero and record a `Shortage` so later systems (events, scoring, the UI)
//! can see what was missing instead of the deficit being silently dropped.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Every stock tracked by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Food,
    Timber,
    Steel,
    Cement,
    Prefab,
    Money,
    Vodka,
    Population,
    PowerGenerated,
    PowerUsed,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 10] = [
        ResourceKind::Food,
        ResourceKind::Timber,
        ResourceKind::Steel,
        ResourceKind::Cement,
        ResourceKind::Prefab,
        ResourceKind::Money,
        ResourceKind::Vodka,
        ResourceKind::Population,
        ResourceKind::PowerGenerated,
        ResourceKind::PowerUsed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Food => "food",
            ResourceKind::Timber => "timber",
            ResourceKind::Steel => "steel",
            ResourceKind::Cement => "cement",
            ResourceKind::Prefab => "prefab",
            ResourceKind::Money => "money",
            ResourceKind::Vodka => "vodka",
            ResourceKind::Population => "population",
            ResourceKind::PowerGenerated => "power generated",
            ResourceKind::PowerUsed => "power used",
        }
    }
}

/// Which system asked for more than was in stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortageSource {
    Production,
    Deliveries,
    Rations,
    Heating,
    Vodka,
    Event,
    Construction,
}

/// A withdrawal that could not be fully honoured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shortage {
    pub resource: ResourceKind,
    pub requested: f64,
    pub available: f64,
    pub source: ShortageSource,
}

impl Shortage {
    pub fn missing(&self) -> f64 {
        self.requested - self.available
    }
}

/// Global stock quantities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceStore {
    pub food: f64,
    pub timber: f64,
    pub steel: f64,
    pub cement: f64,
    pub prefab: f64,
    pub money: f64,
    pub vodka: f64,
    pub population: f64,
    pub power_generated: f64,
    pub power_used: f64,
    /// Shortages recorded during the current tick
    #[serde(default)]
    pub shortages: Vec<Shortage>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current amount of a resource
    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Timber => self.timber,
            ResourceKind::Steel => self.steel,
            ResourceKind::Cement => self.cement,
            ResourceKind::Prefab => self.prefab,
            ResourceKind::Money => self.money,
            ResourceKind::Vodka => self.vodka,
            ResourceKind::Population => self.population,
            ResourceKind::PowerGenerated => self.power_generated,
            ResourceKind::PowerUsed => self.power_used,
        }
    }

    fn slot(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Food => &mut self.food,
            ResourceKind::Timber => &mut self.timber,
            ResourceKind::Steel => &mut self.steel,
            ResourceKind::Cement => &mut self.cement,
            ResourceKind::Prefab => &mut self.prefab,
            ResourceKind::Money => &mut self.money,
            ResourceKind::Vodka => &mut self.vodka,
            ResourceKind::Population => &mut self.population,
            ResourceKind::PowerGenerated => &mut self.power_generated,
            ResourceKind::PowerUsed => &mut self.power_used,
        }
    }

    /// Overwrite a quantity (negative input is clamped to zero)
    pub fn set(&mut self, kind: ResourceKind, amount: f64) {
        *self.slot(kind) = amount.max(0.0);
    }

    /// Add a non-negative amount
    pub fn add(&mut self, kind: ResourceKind, amount: f64) {
        if amount > 0.0 {
            *self.slot(kind) += amount;
        }
    }

    /// Withdraw up to `amount`, returns the amount actually removed.
    /// Any deficit is recorded as a shortage.
    pub fn withdraw(&mut self, kind: ResourceKind, amount: f64, source: ShortageSource) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let slot = self.slot(kind);
        let available = *slot;
        let removed = amount.min(available);
        *slot = available - removed;
        if removed < amount {
            self.shortages.push(Shortage {
                resource: kind,
                requested: amount,
                available,
                source,
            });
        }
        removed
    }

    /// Apply a signed delta; negative deltas go through `withdraw`
    pub fn apply_delta(&mut self, kind: ResourceKind, delta: f64, source: ShortageSource) -> f64 {
        if delta >= 0.0 {
            self.add(kind, delta);
            delta
        } else {
            -self.withdraw(kind, -delta, source)
        }
    }

    /// Check if the store has enough of every listed resource
    pub fn has_all(&self, requirements: &[(ResourceKind, f64)]) -> bool {
        requirements.iter().all(|(kind, amount)| self.get(*kind) >= *amount)
    }

    /// Consume a bill of materials atomically, returns true if successful
    pub fn consume_all(&mut self, requirements: &[(ResourceKind, f64)]) -> bool {
        if !self.has_all(requirements) {
            return false;
        }
        for (kind, amount) in requirements {
            *self.slot(*kind) -= amount;
        }
        true
    }

    /// Draw a recipe's inputs scaled by `scale`, returns the fraction (0-1)
    /// that could be honoured. All inputs are drawn at that same fraction;
    /// each limiting input is recorded as a shortage.
    pub fn draw_inputs(
        &mut self,
        inputs: &[(ResourceKind, f64)],
        scale: f64,
        source: ShortageSource,
    ) -> f64 {
        if scale <= 0.0 {
            return 0.0;
        }
        let mut fraction: f64 = 1.0;
        for (kind, per_unit) in inputs {
            let wanted = per_unit * scale;
            if wanted > 0.0 {
                fraction = fraction.min(self.get(*kind) / wanted);
            }
        }
        let fraction = fraction.clamp(0.0, 1.0);

        for (kind, per_unit) in inputs {
            let wanted = per_unit * scale;
            if fraction < 1.0 && self.get(*kind) < wanted {
                self.shortages.push(Shortage {
                    resource: *kind,
                    requested: wanted,
                    available: self.get(*kind),
                    source,
                });
            }
            let slot = self.slot(*kind);
            *slot = (*slot - wanted * fraction).max(0.0);
        }
        fraction
    }

    pub fn clear_shortages(&mut self) {
        self.shortages.clear();
    }

    pub fn had_shortage(&self, kind: ResourceKind) -> bool {
        self.shortages.iter().any(|s| s.resource == kind)
    }

    /// Verify no quantity is negative or non-finite
    pub fn verify(&self) -> Result<()> {
        for kind in ResourceKind::ALL {
            let value = self.get(kind);
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvariantViolation(format!(
                    "{} is {}",
                    kind.label(),
                    value
                )));
            }
        }
        Ok(())
    }
}
