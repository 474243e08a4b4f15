//! Natural-language insights over flight statistics.
//!
//! [`InsightGenerator`] asks OpenAI for a JSON analysis and falls back to
//! [`fallback_insights`] on any failure. Both paths produce an
//! [`InsightResult`] with every field populated.

mod fallback;
mod generator;
mod types;

pub use fallback::*;
pub use generator::*;
pub use types::*;
