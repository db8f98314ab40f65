//! Calendar system for date tracking
//!
//! One tick is one day. Months are a flat 30 days and years 12 months, which
//! keeps monthly and yearly subsystems on exact tick boundaries.

use serde::{Deserialize, Serialize};

pub const DAYS_PER_MONTH: u64 = 30;
pub const MONTHS_PER_YEAR: u64 = 12;
pub const TICKS_PER_YEAR: u64 = DAYS_PER_MONTH * MONTHS_PER_YEAR;

/// Season of the year, used for the weather signal consumed by events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    /// Event frequency multiplier from weather
    pub fn event_modifier(&self) -> f32 {
        match self {
            Season::Winter => 1.3,
            Season::Spring => 1.0,
            Season::Summer => 0.8,
            Season::Autumn => 1.0,
        }
    }
}

/// Calendar date (1-based month and day)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

/// Calendar tracks simulation time with day granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    tick: u64,
    start_year: u32,
}

impl Calendar {
    pub fn new(start_year: u32) -> Self {
        Self { tick: 0, start_year }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn start_year(&self) -> u32 {
        self.start_year
    }

    pub fn year(&self) -> u32 {
        self.start_year + (self.tick / TICKS_PER_YEAR) as u32
    }

    pub fn month(&self) -> u32 {
        ((self.tick / DAYS_PER_MONTH) % MONTHS_PER_YEAR) as u32 + 1
    }

    pub fn day(&self) -> u32 {
        (self.tick % DAYS_PER_MONTH) as u32 + 1
    }

    pub fn date(&self) -> GameDate {
        GameDate {
            year: self.year(),
            month: self.month(),
            day: self.day(),
        }
    }

    pub fn season(&self) -> Season {
        Season::from_month(self.month())
    }

    /// Heating season runs October through April
    pub fn is_heating_season(&self) -> bool {
        let m = self.month();
        m >= 10 || m <= 4
    }

    /// True on the final day of a month, when monthly systems run
    pub fn is_month_end(&self) -> bool {
        (self.tick + 1) % DAYS_PER_MONTH == 0
    }

    /// True on the final day of a year, when yearly systems run
    pub fn is_year_end(&self) -> bool {
        (self.tick + 1) % TICKS_PER_YEAR == 0
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(1917)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(4), Season::Spring);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Autumn);
        assert_eq!(Season::from_month(12), Season::Winter);
    }

    #[test]
    fn test_calendar_advances() {
        let mut cal = Calendar::new(1917);
        assert_eq!(cal.date(), GameDate { year: 1917, month: 1, day: 1 });

        for _ in 0..DAYS_PER_MONTH {
            cal.advance();
        }
        assert_eq!(cal.date(), GameDate { year: 1917, month: 2, day: 1 });

        for _ in DAYS_PER_MONTH..TICKS_PER_YEAR {
            cal.advance();
        }
        assert_eq!(cal.date(), GameDate { year: 1918, month: 1, day: 1 });
    }

    #[test]
    fn test_month_and_year_end() {
        let mut cal = Calendar::new(1917);
        for _ in 0..29 {
            cal.advance();
        }
        assert!(cal.is_month_end());
        assert!(!cal.is_year_end());

        for _ in 29..(TICKS_PER_YEAR - 1) {
            cal.advance();
        }
        assert!(cal.is_month_end());
        assert!(cal.is_year_end());
    }

    #[test]
    fn test_heating_season() {
        let mut cal = Calendar::new(1917);
        assert!(cal.is_heating_season()); // January
        for _ in 0..(DAYS_PER_MONTH * 5) {
            cal.advance();
        }
        assert_eq!(cal.month(), 6);
        assert!(!cal.is_heating_season());
    }
}
