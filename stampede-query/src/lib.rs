//! Datastore query load generator
//!
//! Drives realistic read/write query patterns against an isolated SQLite
//! working copy, never against a production datastore. The working copy
//! lives in a temp directory that is removed on every exit path.

pub mod generator;
pub mod schema;
pub mod workload;

pub use generator::QueryLoadGenerator;
pub use workload::{QueryCategory, QueryStatement, Workload};
