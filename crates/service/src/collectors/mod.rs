//! Collection cycles
//!
//! Each collector implements [`crate::scheduler::Cycle`]: one `run`
//! builds a fresh batch over all configured projects and hands it to
//! the emitter. A query failure aborts the remaining work for that
//! project only; the other projects still contribute to the batch.

pub mod epic;
pub mod sprint;

#[cfg(test)]
mod tests;

pub use epic::EpicCollector;
pub use sprint::SprintCollector;
