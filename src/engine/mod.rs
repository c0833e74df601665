//! Settlement engine: pure planning plus atomic execution.

pub mod planner;
pub mod settlement;

pub use planner::{PlannedLeg, ReversalCause};
pub use settlement::{SettlementEngine, SettlementOutcome};
