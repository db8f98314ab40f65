pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Calendar, GameDate, Season};
pub use config::SimulationConfig;
pub use error::{Result, SimError};
