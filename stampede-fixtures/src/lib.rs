//! Pre-generated test fixtures for a Stampede run
//!
//! A [`FixtureSet`] is loaded once before any generator starts, from JSON
//! files produced by an out-of-scope setup step, and shared read-only by
//! reference for the whole run. Missing or empty pools are setup errors.

pub mod error;
pub mod loader;
pub mod types;

pub use error::FixtureError;
pub use loader::FixtureSet;
pub use types::{CodeSample, CodeVariant, Identity, Problem};
