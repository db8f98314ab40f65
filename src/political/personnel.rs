//! Personnel file and threat level
//!
//! The file is append-only. Effective marks are computed on demand from the
//! entries and the current tick, so the only ways they go down are time
//! passing and commendations.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::types::Tick;

/// Effective marks at which the chairman is arrested
pub const ARREST_MARKS: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatLevel {
    Safe,
    Watched,
    Warned,
    Investigated,
    Reviewed,
    Arrested,
}

impl ThreatLevel {
    pub const ALL: [ThreatLevel; 6] = [
        ThreatLevel::Safe,
        ThreatLevel::Watched,
        ThreatLevel::Warned,
        ThreatLevel::Investigated,
        ThreatLevel::Reviewed,
        ThreatLevel::Arrested,
    ];

    /// Lower bound on effective marks for this level
    pub fn threshold(&self) -> f64 {
        match self {
            ThreatLevel::Safe => 0.0,
            ThreatLevel::Watched => 2.0,
            ThreatLevel::Warned => 4.0,
            ThreatLevel::Investigated => 5.0,
            ThreatLevel::Reviewed => 6.0,
            ThreatLevel::Arrested => ARREST_MARKS,
        }
    }

    pub fn from_effective_marks(marks: f64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|level| marks >= level.threshold())
            .unwrap_or(ThreatLevel::Safe)
    }

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThreatLevel::Safe => "safe",
            ThreatLevel::Watched => "watched",
            ThreatLevel::Warned => "warned",
            ThreatLevel::Investigated => "investigated",
            ThreatLevel::Reviewed => "reviewed",
            ThreatLevel::Arrested => "arrested",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    BlackMark,
    Commendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub kind: EntryKind,
    pub magnitude: f64,
    pub tick: Tick,
    pub reason: String,
}

impl FileEntry {
    /// Remaining weight of a black mark after decay
    fn decayed(&self, now: Tick, decay_ticks: u64) -> f64 {
        let elapsed = now.saturating_sub(self.tick);
        let steps = (elapsed / decay_ticks.max(1)) as f64;
        (self.magnitude - steps).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelFile {
    entries: Vec<FileEntry>,
    decay_ticks: u64,
    arrest_raised: bool,
}

impl PersonnelFile {
    pub fn new(decay_ticks: u64) -> Self {
        Self {
            entries: Vec::new(),
            decay_ticks,
            arrest_raised: false,
        }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn add_mark(&mut self, magnitude: f64, tick: Tick, reason: impl Into<String>) {
        if magnitude > 0.0 {
            self.entries.push(FileEntry {
                kind: EntryKind::BlackMark,
                magnitude,
                tick,
                reason: reason.into(),
            });
        }
    }

    pub fn add_commendation(&mut self, magnitude: f64, tick: Tick, reason: impl Into<String>) {
        if magnitude > 0.0 {
            self.entries.push(FileEntry {
                kind: EntryKind::Commendation,
                magnitude,
                tick,
                reason: reason.into(),
            });
        }
    }

    pub fn black_marks(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::BlackMark)
            .count()
    }

    pub fn commendations(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Commendation)
            .count()
    }

    /// Decayed marks minus commendations, floored at zero
    pub fn effective_marks(&self, now: Tick) -> f64 {
        let mut total = 0.0;
        for entry in &self.entries {
            match entry.kind {
                EntryKind::BlackMark => total += entry.decayed(now, self.decay_ticks),
                EntryKind::Commendation => total -= entry.magnitude,
            }
        }
        total.max(0.0)
    }

    pub fn threat(&self, now: Tick) -> ThreatLevel {
        if self.arrest_raised {
            return ThreatLevel::Arrested;
        }
        ThreatLevel::from_effective_marks(self.effective_marks(now))
    }

    /// True exactly once: on the first check at or above the arrest ceiling
    pub fn check_arrest(&mut self, now: Tick) -> bool {
        if self.arrest_raised {
            return false;
        }
        if self.effective_marks(now) >= ARREST_MARKS {
            self.arrest_raised = true;
            warn!(marks = self.effective_marks(now), tick = now, "chairman arrested");
            return true;
        }
        false
    }

    pub fn is_arrested(&self) -> bool {
        self.arrest_raised
    }
}
