//! Boardpulse Service
//!
//! Core logic of the exporter: issue aggregation, the epic and sprint
//! collection cycles, the recurring scheduler and the batch emitter.

pub mod aggregate;
pub mod collectors;
pub mod emitter;
pub mod scheduler;

pub use aggregate::{
	impediment_totals, story_point_totals, ImpedimentTotals, StoryPointTotals, DEPENDENCY_LABEL,
	TOTAL_BUCKET, UNKNOWN_IMPEDIMENT_TYPE,
};
pub use collectors::{EpicCollector, SprintCollector};
pub use emitter::BatchEmitter;
pub use scheduler::{start, Cycle, CycleHandle};
