//! Doctrines (eras) and their fixed delivery tables
//!
//! Doctrines are ordered and only ever move forward. The rate table of the
//! active doctrine applies as-is from the first tick of the era; there is no
//! blending across the transition.

use serde::{Deserialize, Serialize};

/// Fraction of this tick's gross output taken by the state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRates {
    pub food: f32,
    pub vodka: f32,
    pub money: f32,
}

/// How often and how hard the military draft bites during a doctrine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConscriptionPolicy {
    /// Ticks between draft waves
    pub interval: u64,
    /// Fraction of eligible citizens drafted per wave
    pub rate: f32,
    /// Drafted citizens never come back
    pub permanent: bool,
    /// Fraction of drafted citizens killed
    pub casualty_rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Doctrine {
    Revolutionary,
    Industrialization,
    Wartime,
    Reconstruction,
    Thaw,
    Freeze,
    Stagnation,
    Eternal,
}

impl Doctrine {
    pub const ALL: [Doctrine; 8] = [
        Doctrine::Revolutionary,
        Doctrine::Industrialization,
        Doctrine::Wartime,
        Doctrine::Reconstruction,
        Doctrine::Thaw,
        Doctrine::Freeze,
        Doctrine::Stagnation,
        Doctrine::Eternal,
    ];

    /// The doctrine a calendar year belongs to
    pub fn for_year(year: u32) -> Self {
        match year {
            0..=1927 => Doctrine::Revolutionary,
            1928..=1940 => Doctrine::Industrialization,
            1941..=1945 => Doctrine::Wartime,
            1946..=1952 => Doctrine::Reconstruction,
            1953..=1963 => Doctrine::Thaw,
            1964..=1969 => Doctrine::Freeze,
            1970..=1984 => Doctrine::Stagnation,
            _ => Doctrine::Eternal,
        }
    }

    /// Next doctrine for `year`; never goes backwards
    pub fn advance_for_year(self, year: u32) -> Self {
        self.max(Doctrine::for_year(year))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Doctrine::Revolutionary => "revolutionary",
            Doctrine::Industrialization => "industrialization",
            Doctrine::Wartime => "wartime",
            Doctrine::Reconstruction => "reconstruction",
            Doctrine::Thaw => "thaw",
            Doctrine::Freeze => "freeze",
            Doctrine::Stagnation => "stagnation",
            Doctrine::Eternal => "eternal",
        }
    }

    pub fn delivery_rates(&self) -> DeliveryRates {
        let (food, vodka, money) = match self {
            Doctrine::Revolutionary => (0.30, 0.10, 0.10),
            Doctrine::Industrialization => (0.40, 0.20, 0.20),
            Doctrine::Wartime => (0.60, 0.30, 0.40),
            Doctrine::Reconstruction => (0.45, 0.20, 0.25),
            Doctrine::Thaw => (0.25, 0.15, 0.15),
            Doctrine::Freeze => (0.35, 0.20, 0.20),
            Doctrine::Stagnation => (0.30, 0.25, 0.20),
            Doctrine::Eternal => (0.50, 0.35, 0.35),
        };
        DeliveryRates { food, vodka, money }
    }

    /// Multiplier applied to each replacement quota target
    pub fn quota_escalation(&self) -> f64 {
        match self {
            Doctrine::Revolutionary => 1.0,
            Doctrine::Industrialization => 1.3,
            Doctrine::Wartime => 1.5,
            Doctrine::Reconstruction => 1.2,
            Doctrine::Thaw => 1.1,
            Doctrine::Freeze => 1.2,
            Doctrine::Stagnation => 1.05,
            Doctrine::Eternal => 1.4,
        }
    }

    /// Event frequency multiplier
    pub fn event_frequency(&self) -> f32 {
        match self {
            Doctrine::Revolutionary => 1.2,
            Doctrine::Industrialization => 1.0,
            Doctrine::Wartime => 1.5,
            Doctrine::Reconstruction => 1.0,
            Doctrine::Thaw => 0.8,
            Doctrine::Freeze => 1.0,
            Doctrine::Stagnation => 0.9,
            Doctrine::Eternal => 1.3,
        }
    }

    pub fn conscription(&self) -> ConscriptionPolicy {
        match self {
            Doctrine::Wartime => ConscriptionPolicy {
                interval: 90,
                rate: 0.10,
                permanent: true,
                casualty_rate: 0.4,
            },
            Doctrine::Revolutionary => ConscriptionPolicy {
                interval: 180,
                rate: 0.03,
                permanent: false,
                casualty_rate: 0.05,
            },
            _ => ConscriptionPolicy {
                interval: 360,
                rate: 0.03,
                permanent: false,
                casualty_rate: 0.05,
            },
        }
    }

    /// Score multiplier for the era's subtotal
    pub fn era_multiplier(&self) -> f64 {
        match self {
            Doctrine::Revolutionary => 1.0,
            Doctrine::Industrialization => 1.2,
            Doctrine::Wartime => 1.5,
            Doctrine::Reconstruction => 1.3,
            Doctrine::Thaw => 1.0,
            Doctrine::Freeze => 1.2,
            Doctrine::Stagnation => 1.1,
            Doctrine::Eternal => 2.0,
        }
    }

    /// Leader the politburo is headed by during this doctrine
    pub fn general_secretary(&self) -> &'static str {
        match self {
            Doctrine::Revolutionary => "Lenin",
            Doctrine::Industrialization | Doctrine::Wartime => "Stalin",
            Doctrine::Reconstruction => "Stalin",
            Doctrine::Thaw => "Khrushchev",
            Doctrine::Freeze | Doctrine::Stagnation => "Brezhnev",
            Doctrine::Eternal => "The Eternal Secretary",
        }
    }
}
