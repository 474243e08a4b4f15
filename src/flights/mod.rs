//! Synthetic flight data.
//!
//! - [`SearchCriteria`]: validated origin, destination and date range
//! - [`FlightRecord`]: one synthesized flight observation
//! - [`FlightSynthesizer`]: seeded fare heuristic producing records per day

mod synthesizer;
mod types;

pub use synthesizer::*;
pub use types::*;
