//! Virtual team actor population
//!
//! Spawns many concurrent "virtual team" actors, each combining a
//! persistent realtime connection with periodic API actions chosen by a
//! weighted behavior profile. Actors own all of their mutable state and
//! report results to the population aggregator over a typed channel.

pub mod actor;
pub mod connection;
pub mod events;
pub mod manager;
pub mod profile;
pub mod realtime;

pub use actor::{ActorState, VirtualActor};
pub use connection::{ConnectionState, ConnectionStateMachine};
pub use events::{ContestPhase, RealtimeEvent};
pub use manager::ActorPopulationManager;
pub use profile::{ActorAction, BehaviorProfile, ProfileKind};
