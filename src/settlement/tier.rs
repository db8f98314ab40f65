//! Settlement tier definitions
//!
//! Tiers are pure data: one definition per tier with its thresholds and the
//! number of consecutive ticks required before a promotion or demotion.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::city::building::{BuildingArchetype, BuildingRole};
use crate::core::error::{Result, SimError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum SettlementTier {
    #[default]
    Selo,
    Posyolok,
    Pgt,
    Gorod,
}

impl SettlementTier {
    pub const ALL: [SettlementTier; 4] = [
        SettlementTier::Selo,
        SettlementTier::Posyolok,
        SettlementTier::Pgt,
        SettlementTier::Gorod,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<SettlementTier> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<SettlementTier> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn name(&self) -> &'static str {
        match self {
            SettlementTier::Selo => "selo",
            SettlementTier::Posyolok => "posyolok",
            SettlementTier::Pgt => "pgt",
            SettlementTier::Gorod => "gorod",
        }
    }

    /// Scale applied to monthly fondy allocations
    pub fn fondy_multiplier(&self) -> f64 {
        match self {
            SettlementTier::Selo => 1.0,
            SettlementTier::Posyolok => 1.5,
            SettlementTier::Pgt => 2.0,
            SettlementTier::Gorod => 3.0,
        }
    }
}

/// Requirements of one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    pub tier: SettlementTier,
    /// Minimum population
    pub population: u32,
    /// Minimum share of job capacity outside agriculture, 0-100
    pub non_agricultural_percent: f32,
    /// Roles that must have at least one building
    pub required_roles: Vec<BuildingRole>,
    /// Minimum number of distinct roles present (0 = no requirement)
    pub min_distinct_roles: usize,
    /// Consecutive qualifying ticks before promotion into this tier
    pub promotion_ticks: u32,
    /// Consecutive failing ticks before demotion out of this tier
    pub demotion_ticks: u32,
}

/// What the settlement looks like this tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementMetrics {
    pub population: u32,
    pub non_agricultural_percent: f32,
    pub roles: BTreeSet<BuildingRole>,
}

impl SettlementMetrics {
    pub fn measure(population: u32, buildings: &BuildingArchetype) -> Self {
        Self {
            population,
            non_agricultural_percent: buildings.non_agricultural_percent(),
            roles: buildings.building_types.iter().map(|t| t.role()).collect(),
        }
    }
}

impl TierDefinition {
    pub fn is_met(&self, metrics: &SettlementMetrics) -> bool {
        metrics.population >= self.population
            && metrics.non_agricultural_percent >= self.non_agricultural_percent
            && self.required_roles.iter().all(|r| metrics.roles.contains(r))
            && metrics.roles.len() >= self.min_distinct_roles
    }
}

pub fn default_tiers() -> Vec<TierDefinition> {
    use BuildingRole::*;
    vec![
        TierDefinition {
            tier: SettlementTier::Selo,
            population: 0,
            non_agricultural_percent: 0.0,
            required_roles: vec![],
            min_distinct_roles: 0,
            promotion_ticks: 0,
            demotion_ticks: 0,
        },
        TierDefinition {
            tier: SettlementTier::Posyolok,
            population: 50,
            non_agricultural_percent: 25.0,
            required_roles: vec![Industry],
            min_distinct_roles: 0,
            promotion_ticks: 30,
            demotion_ticks: 60,
        },
        TierDefinition {
            tier: SettlementTier::Pgt,
            population: 200,
            non_agricultural_percent: 50.0,
            required_roles: vec![Industry, Medical, Education],
            min_distinct_roles: 0,
            promotion_ticks: 60,
            demotion_ticks: 90,
        },
        TierDefinition {
            tier: SettlementTier::Gorod,
            population: 1000,
            non_agricultural_percent: 85.0,
            required_roles: vec![Industry, Administration, Medical, Education, Culture],
            min_distinct_roles: 7,
            promotion_ticks: 90,
            demotion_ticks: 120,
        },
    ]
}

/// Reject tier tables with unreachable or undefined behavior
pub fn validate_tiers(tiers: &[TierDefinition]) -> Result<()> {
    let invalid = |msg: String| Err(SimError::InvalidConfiguration(msg));

    if tiers.len() != SettlementTier::ALL.len() {
        return invalid(format!("expected 4 tier definitions, got {}", tiers.len()));
    }
    for (def, expected) in tiers.iter().zip(SettlementTier::ALL) {
        if def.tier != expected {
            return invalid(format!(
                "tier definitions out of order: found {} where {} was expected",
                def.tier.name(),
                expected.name()
            ));
        }
        if !(0.0..=100.0).contains(&def.non_agricultural_percent) {
            return invalid(format!(
                "{}: non_agricultural_percent {} outside 0-100",
                def.tier.name(),
                def.non_agricultural_percent
            ));
        }
        if def.min_distinct_roles > BuildingRole::ALL.len() {
            return invalid(format!(
                "{}: min_distinct_roles {} exceeds the {} roles that exist",
                def.tier.name(),
                def.min_distinct_roles,
                BuildingRole::ALL.len()
            ));
        }
        if def.min_distinct_roles != 0 && def.min_distinct_roles < def.required_roles.len() {
            return invalid(format!(
                "{}: min_distinct_roles {} is below its {} required roles",
                def.tier.name(),
                def.min_distinct_roles,
                def.required_roles.len()
            ));
        }
        if def.tier != SettlementTier::Selo && (def.promotion_ticks == 0 || def.demotion_ticks == 0) {
            return invalid(format!(
                "{}: promotion and demotion durations must be positive",
                def.tier.name()
            ));
        }
    }
    for pair in tiers.windows(2) {
        if pair[1].population <= pair[0].population {
            return invalid(format!(
                "{} population {} must exceed {} population {}",
                pair[1].tier.name(),
                pair[1].population,
                pair[0].tier.name(),
                pair[0].population
            ));
        }
        if pair[1].non_agricultural_percent < pair[0].non_agricultural_percent {
            return invalid(format!(
                "{} non_agricultural_percent must not be below {}",
                pair[1].tier.name(),
                pair[0].tier.name()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(validate_tiers(&default_tiers()).is_ok());
    }

    #[test]
    fn test_tier_order_helpers() {
        assert_eq!(SettlementTier::Selo.next(), Some(SettlementTier::Posyolok));
        assert_eq!(SettlementTier::Gorod.next(), None);
        assert_eq!(SettlementTier::Selo.prev(), None);
        assert_eq!(SettlementTier::Pgt.prev(), Some(SettlementTier::Posyolok));
    }

    #[test]
    fn test_rejects_non_increasing_population() {
        let mut tiers = default_tiers();
        tiers[2].population = 50;
        assert!(matches!(validate_tiers(&tiers), Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rejects_missing_tier() {
        let mut tiers = default_tiers();
        tiers.pop();
        assert!(validate_tiers(&tiers).is_err());
    }

    #[test]
    fn test_rejects_unreachable_role_count() {
        let mut tiers = default_tiers();
        tiers[3].min_distinct_roles = 11;
        assert!(validate_tiers(&tiers).is_err());

        let mut tiers = default_tiers();
        tiers[3].min_distinct_roles = 3;
        assert!(validate_tiers(&tiers).is_err());
    }

    #[test]
    fn test_rejects_zero_duration() {
        let mut tiers = default_tiers();
        tiers[1].promotion_ticks = 0;
        assert!(validate_tiers(&tiers).is_err());
    }

    #[test]
    fn test_is_met_checks_roles() {
        let def = &default_tiers()[1];
        let mut metrics = SettlementMetrics {
            population: 60,
            non_agricultural_percent: 40.0,
            roles: BTreeSet::new(),
        };
        assert!(!def.is_met(&metrics));
        metrics.roles.insert(BuildingRole::Industry);
        assert!(def.is_met(&metrics));
    }
}
