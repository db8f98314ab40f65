//! The simulation core: world context, command queue, tick pipeline,
//! pacing, snapshots and save files.

pub mod command;
pub mod save;
pub mod scheduler;
pub mod snapshot;
pub mod tick;
pub mod world;

pub use command::{CommandOutcome, RejectReason, SimCommand};
pub use save::{load_from_file, load_from_json, save_to_file, save_to_json, SaveState};
pub use scheduler::{FrameReport, GameSpeed, TickScheduler};
pub use snapshot::{CitizenView, WorldSnapshot};
pub use tick::{DemographicsSummary, TickReport};
pub use world::SimulationWorld;
