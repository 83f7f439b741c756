//! Boardpulse API
//!
//! Minimal HTTP surface: a liveness endpoint for process supervisors.
//! Collection cycles never report through it; a failed cycle is a log
//! line, not an unhealthy process.

pub mod handlers;
pub mod router;

pub use router::create_router;
