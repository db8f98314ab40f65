//! Workforce - collective focus, job assignment and efficiency

pub mod efficiency;
pub mod focus;
pub mod governor;

pub use efficiency::{building_efficiency, effective_workers, Efficiency, EfficiencyReason};
pub use focus::CollectiveFocus;
pub use governor::{compute_staffing, GovernorReport, StaffingReport, WorkerGovernor};
