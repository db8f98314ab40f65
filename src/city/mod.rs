//! City layer - buildings, recipes, production, power and terrain

pub mod building;
pub mod power;
pub mod production;
pub mod recipe;
pub mod terrain;

pub use building::{BuildingArchetype, BuildingRole, BuildingType};
pub use power::{distribute_power, PowerReport};
pub use production::{tick_production, ProductionReport};
pub use recipe::{Recipe, RecipeCatalog};
pub use terrain::{TerrainGrid, TerrainKind};
