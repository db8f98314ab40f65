//! Era scoring and medals
//!
//! Counters accumulate during an era. At era close the subtotal is computed,
//! weighted by the doctrine's era multiplier and added to the running total;
//! the highest medal the subtotal reaches is awarded. The settings multiplier
//! (difficulty x consequences) scales only the grand total.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::types::Tick;
use crate::economy::doctrine::Doctrine;

pub const POINTS_WORKER_ALIVE: f64 = 1.0;
pub const POINTS_QUOTA_MET: f64 = 50.0;
pub const POINTS_QUOTA_EXCEEDED: f64 = 25.0;
pub const POINTS_BUILDING: f64 = 5.0;
pub const POINTS_COMMENDATION: f64 = 10.0;
pub const POINTS_BLACK_MARK: f64 = -15.0;
pub const POINTS_KGB_LOSS: f64 = -5.0;
pub const POINTS_CONSCRIPTED: f64 = -2.0;
pub const CLEAN_ERA_BONUS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Worker,
    #[default]
    Comrade,
    Tovarish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Consequences {
    Forgiving,
    #[default]
    Permadeath,
    Harsh,
}

/// Difficulty x consequences lookup
pub fn settings_multiplier(difficulty: Difficulty, consequences: Consequences) -> f64 {
    const TABLE: [[f64; 3]; 3] = [[0.5, 0.8, 1.0], [1.0, 1.5, 1.8], [1.5, 2.0, 3.0]];
    let row = match difficulty {
        Difficulty::Worker => 0,
        Difficulty::Comrade => 1,
        Difficulty::Tovarish => 2,
    };
    let col = match consequences {
        Consequences::Forgiving => 0,
        Consequences::Permadeath => 1,
        Consequences::Harsh => 2,
    };
    TABLE[row][col]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Medal {
    Tin,
    Copper,
    Bronze,
    Iron,
    Concrete,
}

impl Medal {
    pub fn threshold(&self) -> f64 {
        match self {
            Medal::Tin => 100.0,
            Medal::Copper => 250.0,
            Medal::Bronze => 500.0,
            Medal::Iron => 1000.0,
            Medal::Concrete => 2000.0,
        }
    }

    /// Highest medal an era subtotal qualifies for
    pub fn for_subtotal(subtotal: f64) -> Option<Medal> {
        [Medal::Concrete, Medal::Iron, Medal::Bronze, Medal::Copper, Medal::Tin]
            .into_iter()
            .find(|m| subtotal >= m.threshold())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Medal::Tin => "tin",
            Medal::Copper => "copper",
            Medal::Bronze => "bronze",
            Medal::Iron => "iron",
            Medal::Concrete => "concrete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalAward {
    pub medal: Medal,
    pub doctrine: Doctrine,
    pub tick: Tick,
}

/// Counters for the era in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraTally {
    pub doctrine: Doctrine,
    pub quotas_met: u32,
    pub quotas_exceeded: u32,
    pub commendations: u32,
    pub black_marks: u32,
    pub kgb_losses: u32,
    pub conscripted: u32,
}

impl EraTally {
    fn new(doctrine: Doctrine) -> Self {
        Self {
            doctrine,
            quotas_met: 0,
            quotas_exceeded: 0,
            commendations: 0,
            black_marks: 0,
            kgb_losses: 0,
            conscripted: 0,
        }
    }

    /// Raw era points given the end-of-era head and building counts
    pub fn subtotal(&self, workers_alive: u32, buildings_standing: u32) -> f64 {
        let clean = if self.black_marks == 0 { CLEAN_ERA_BONUS } else { 0.0 };
        workers_alive as f64 * POINTS_WORKER_ALIVE
            + self.quotas_met as f64 * POINTS_QUOTA_MET
            + self.quotas_exceeded as f64 * POINTS_QUOTA_EXCEEDED
            + buildings_standing as f64 * POINTS_BUILDING
            + self.commendations as f64 * POINTS_COMMENDATION
            + self.black_marks as f64 * POINTS_BLACK_MARK
            + self.kgb_losses as f64 * POINTS_KGB_LOSS
            + self.conscripted as f64 * POINTS_CONSCRIPTED
            + clean
    }
}

/// Closed era record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraResult {
    pub tally: EraTally,
    pub workers_alive: u32,
    pub buildings_standing: u32,
    pub subtotal: f64,
    pub weighted: f64,
    pub medal: Option<Medal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSystem {
    difficulty: Difficulty,
    consequences: Consequences,
    current: EraTally,
    eras: Vec<EraResult>,
    medals: Vec<MedalAward>,
    running_total: f64,
}

impl ScoringSystem {
    pub fn new(doctrine: Doctrine, difficulty: Difficulty, consequences: Consequences) -> Self {
        Self {
            difficulty,
            consequences,
            current: EraTally::new(doctrine),
            eras: Vec::new(),
            medals: Vec::new(),
            running_total: 0.0,
        }
    }

    pub fn current(&self) -> &EraTally {
        &self.current
    }

    pub fn eras(&self) -> &[EraResult] {
        &self.eras
    }

    pub fn medals(&self) -> &[MedalAward] {
        &self.medals
    }

    pub fn settings_multiplier(&self) -> f64 {
        settings_multiplier(self.difficulty, self.consequences)
    }

    pub fn record_quota_met(&mut self, exceeded: bool) {
        self.current.quotas_met += 1;
        if exceeded {
            self.current.quotas_exceeded += 1;
        }
    }

    pub fn record_commendation(&mut self) {
        self.current.commendations += 1;
    }

    pub fn record_black_mark(&mut self) {
        self.current.black_marks += 1;
    }

    pub fn record_kgb_losses(&mut self, count: u32) {
        self.current.kgb_losses += count;
    }

    pub fn record_conscripted(&mut self, count: u32) {
        self.current.conscripted += count;
    }

    /// Close the current era and open the next one
    pub fn close_era(
        &mut self,
        next: Doctrine,
        workers_alive: u32,
        buildings_standing: u32,
        tick: Tick,
    ) -> &EraResult {
        let tally = std::mem::replace(&mut self.current, EraTally::new(next));
        let subtotal = tally.subtotal(workers_alive, buildings_standing);
        let weighted = subtotal * tally.doctrine.era_multiplier();
        let medal = Medal::for_subtotal(subtotal);

        if let Some(medal) = medal {
            info!(medal = medal.name(), era = tally.doctrine.name(), subtotal, "medal awarded");
            self.medals.push(MedalAward {
                medal,
                doctrine: tally.doctrine,
                tick,
            });
        }
        self.running_total += weighted;
        self.eras.push(EraResult {
            tally,
            workers_alive,
            buildings_standing,
            subtotal,
            weighted,
            medal,
        });
        let last = self.eras.len() - 1;
        &self.eras[last]
    }

    /// Sum of closed eras, before the settings multiplier
    pub fn running_total(&self) -> f64 {
        self.running_total
    }

    /// Score as if the current era closed now, with the settings multiplier
    pub fn provisional_score(&self, workers_alive: u32, buildings_standing: u32) -> f64 {
        let open = self.current.subtotal(workers_alive, buildings_standing)
            * self.current.doctrine.era_multiplier();
        (self.running_total + open) * self.settings_multiplier()
    }

    /// Grand total over closed eras with the settings multiplier
    pub fn final_score(&self) -> f64 {
        self.running_total * self.settings_multiplier()
    }
}
