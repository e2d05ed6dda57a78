//! Pure scoring layer: signal aggregation and conversion prediction.
//!
//! Everything in here is synchronous, side-effect-free, and safe to call
//! concurrently without coordination.

pub mod predictive;
pub mod signals;
