//! Submission flood generator
//!
//! A pool of paced workers creates submissions through the platform API at
//! a configured aggregate rate, drawing identity, problem, language, and
//! correctness variant per iteration. One smoke-test submission runs
//! before any worker spawns; its failure aborts the whole run.

pub mod generator;
pub mod pacing;
pub mod worker;

pub use generator::SubmissionLoadGenerator;
pub use pacing::{per_worker_rate, worker_delay};
