//! Simulation configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Policy constants that must never be
//! tuned (ration split, arrest ceiling, blat risk tiers) live next to the
//! code that uses them instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::city::building::BuildingType;
use crate::core::error::{Result, SimError};
use crate::scoring::{Consequences, Difficulty};
use crate::settlement::tier::{default_tiers, validate_tiers, TierDefinition};

/// Configuration for the simulation systems
///
/// These values have been tuned to keep a fresh settlement alive through the
/// revolutionary era while still feeling the squeeze of deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// First calendar year of the session
    pub start_year: u32,
    pub difficulty: Difficulty,
    pub consequences: Consequences,
    pub founding: FoundingConfig,
    pub workforce: WorkforceConfig,
    pub economy: EconomyConfig,
    pub political: PoliticalConfig,
    pub events: EventConfig,
    /// Settlement tier ladder, lowest tier first
    pub tiers: Vec<TierDefinition>,
}

/// Initial state of a newly founded settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundingConfig {
    /// Number of households created at founding
    pub households: u32,
    /// Citizens per founding household
    ///
    /// Households get two adults and the remainder as children/elders.
    pub household_size: u32,
    /// Citizens appointed party officials on day one
    pub party_officials: u32,
    pub food: f64,
    pub timber: f64,
    pub steel: f64,
    pub cement: f64,
    pub prefab: f64,
    pub money: f64,
    pub vodka: f64,
    /// Buildings standing on day one, placed left to right on row 0
    pub buildings: Vec<BuildingType>,
}

/// Worker governor tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkforceConfig {
    /// Youngest age that may hold a job
    pub min_working_age: u32,
    /// Oldest age that may hold a job
    pub max_working_age: u32,
    /// Hard ceiling on staffing as a multiple of capacity
    ///
    /// At 1.5 a building with 10 slots takes at most 15 workers when the
    /// collective focus pushes surplus labour into it.
    pub overstaff_limit: f32,
    /// Maximum extra output from overstaffing, as a fraction of capacity
    ///
    /// Effective workers approach `cap * (1 + overstaff_bonus)` and never
    /// exceed it, no matter how many bodies are added.
    pub overstaff_bonus: f32,
}

/// Economic planning tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Food eaten per citizen per tick
    pub food_per_citizen: f64,
    /// Minimum trudodni each working-age citizen owes per tick
    pub min_trudodni_per_worker: f32,
    /// Monthly central allocation before tier scaling
    pub fondy_timber: f64,
    pub fondy_steel: f64,
    pub fondy_cement: f64,
    pub fondy_prefab: f64,
    /// Supply-chain reliability at founding (0-1)
    pub fondy_start_reliability: f32,
    /// Reliability lost per tick while the food delivery rate is heavy
    pub fondy_degrade_rate: f32,
    /// Reliability regained per tick while deliveries are light
    pub fondy_recover_rate: f32,
    /// Food delivery rate at or above which reliability degrades
    pub heavy_delivery_rate: f32,
    /// Food delivery rate at or below which reliability recovers
    pub light_delivery_rate: f32,
    /// Blat gained per black-market transaction
    pub blat_per_transaction: f32,
    /// Blat lost per tick
    pub blat_decay: f32,
    /// Vodka needed per tick by a fully dependent citizen
    pub vodka_per_dependent: f64,
    /// Starting quota target (units of the quota resource)
    pub base_quota_target: f64,
    /// Years allowed for each quota
    pub quota_years: u32,
}

/// Political risk tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoliticalConfig {
    /// Ticks for a black mark to lose one unit of magnitude
    pub mark_decay_ticks: u64,
    /// Per-tick spawn chance per threat ordinal once the watch threshold is reached
    pub kgb_base_chance: f32,
    /// Threat ordinal (Safe = 0) at which investigations start spawning
    pub kgb_watch_threshold: u8,
    /// Concurrent investigation ceiling
    pub max_investigations: usize,
    /// Average morale below which a politruk is dispatched
    pub politruk_morale_threshold: f32,
    /// Politburo patience at founding
    pub politburo_start_patience: f32,
}

/// Event system tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Per-tick event chance before doctrine and weather modifiers
    pub base_chance: f32,
    /// Events kept in the history ring buffer
    pub history_capacity: usize,
    /// Frequency multiplier while heating is failing
    pub heating_failure_multiplier: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: 1917,
            difficulty: Difficulty::Comrade,
            consequences: Consequences::Permadeath,
            founding: FoundingConfig::default(),
            workforce: WorkforceConfig::default(),
            economy: EconomyConfig::default(),
            political: PoliticalConfig::default(),
            events: EventConfig::default(),
            tiers: default_tiers(),
        }
    }
}

impl Default for FoundingConfig {
    fn default() -> Self {
        Self {
            households: 8,
            household_size: 4,
            party_officials: 1,
            food: 400.0,
            timber: 200.0,
            steel: 40.0,
            cement: 60.0,
            prefab: 10.0,
            money: 500.0,
            vodka: 50.0,
            buildings: vec![
                BuildingType::Izba,
                BuildingType::Izba,
                BuildingType::Izba,
                BuildingType::Izba,
                BuildingType::KolkhozFarm,
                BuildingType::KolkhozFarm,
                BuildingType::Sawmill,
            ],
        }
    }
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            min_working_age: 16,
            max_working_age: 60,
            overstaff_limit: 1.5,
            overstaff_bonus: 0.2,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            food_per_citizen: 0.1,
            min_trudodni_per_worker: 0.6,
            fondy_timber: 40.0,
            fondy_steel: 10.0,
            fondy_cement: 20.0,
            fondy_prefab: 5.0,
            fondy_start_reliability: 0.8,
            fondy_degrade_rate: 0.002,
            fondy_recover_rate: 0.0005,
            heavy_delivery_rate: 0.45,
            light_delivery_rate: 0.3,
            blat_per_transaction: 5.0,
            blat_decay: 0.05,
            vodka_per_dependent: 0.02,
            base_quota_target: 600.0,
            quota_years: 5,
        }
    }
}

impl Default for PoliticalConfig {
    fn default() -> Self {
        Self {
            mark_decay_ticks: 360,
            kgb_base_chance: 0.004,
            kgb_watch_threshold: 1,
            max_investigations: 2,
            politruk_morale_threshold: 40.0,
            politburo_start_patience: 60.0,
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            base_chance: 0.02,
            history_capacity: 64,
            heating_failure_multiplier: 1.5,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML override; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    ///
    /// An invalid configuration is fatal at startup: the world refuses to
    /// initialize rather than run with undefined tier behavior.
    pub fn validate(&self) -> Result<()> {
        validate_tiers(&self.tiers)?;

        let w = &self.workforce;
        if w.min_working_age > w.max_working_age {
            return Err(SimError::InvalidConfiguration(format!(
                "min_working_age ({}) exceeds max_working_age ({})",
                w.min_working_age, w.max_working_age
            )));
        }
        if w.overstaff_limit < 1.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "overstaff_limit ({}) must be >= 1.0",
                w.overstaff_limit
            )));
        }
        if !(0.0..=1.0).contains(&w.overstaff_bonus) {
            return Err(SimError::InvalidConfiguration(
                "overstaff_bonus must be within 0-1".into(),
            ));
        }

        let e = &self.economy;
        if !(0.0..=1.0).contains(&e.fondy_start_reliability) {
            return Err(SimError::InvalidConfiguration(
                "fondy_start_reliability must be within 0-1".into(),
            ));
        }
        if e.light_delivery_rate > e.heavy_delivery_rate {
            return Err(SimError::InvalidConfiguration(format!(
                "light_delivery_rate ({}) should be <= heavy_delivery_rate ({})",
                e.light_delivery_rate, e.heavy_delivery_rate
            )));
        }
        if e.food_per_citizen < 0.0 || e.base_quota_target <= 0.0 || e.quota_years == 0 {
            return Err(SimError::InvalidConfiguration(
                "food_per_citizen must be non-negative and quotas must have a positive target and span".into(),
            ));
        }

        if self.political.mark_decay_ticks == 0 {
            return Err(SimError::InvalidConfiguration(
                "mark_decay_ticks must be positive".into(),
            ));
        }
        if self.events.history_capacity == 0 {
            return Err(SimError::InvalidConfiguration(
                "event history_capacity must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            start_year = 1925

            [economy]
            food_per_citizen = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.start_year, 1925);
        assert_eq!(config.economy.food_per_citizen, 0.2);
        assert_eq!(config.economy.quota_years, 5);
        assert_eq!(config.tiers.len(), 4);
    }

    #[test]
    fn test_bad_working_age_rejected() {
        let mut config = SimulationConfig::default();
        config.workforce.min_working_age = 70;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_unparseable_toml_is_an_error() {
        let err = SimulationConfig::from_toml_str("start_year = \"soon\"").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }
}
