//! Population layer - citizens, households, loyalty and demographics

pub mod citizen;
pub mod demographics;
pub mod dvor;
pub mod registry;

pub use citizen::{Assignment, Citizen, CitizenClass, Gender};
pub use demographics::{age_population, monthly_demographics, DemographicsReport};
pub use dvor::{apply_food_loyalty, roll_unrest, Dvor, Unrest, LOYALTY_LOSS_STARVATION};
pub use registry::CitizenRegistry;
