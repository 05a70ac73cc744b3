//! Behavior profiles
//!
//! A profile fixes an actor's action weights and idle pacing for the whole
//! run. The population splits 20/60/20 across aggressive, moderate, and
//! conservative profiles.

use rand::Rng;
use stampede_core::selection::WeightedChoice;
use std::time::Duration;

/// The API actions a virtual actor can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorAction {
    Submit,
    Leaderboard,
    SwitchProblem,
    ViewProblem,
    CheckSubmissions,
}

impl ActorAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorAction::Submit => "submit",
            ActorAction::Leaderboard => "leaderboard",
            ActorAction::SwitchProblem => "switch_problem",
            ActorAction::ViewProblem => "view_problem",
            ActorAction::CheckSubmissions => "check_submissions",
        }
    }
}

/// How active an actor is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Aggressive,
    Moderate,
    Conservative,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Aggressive => "aggressive",
            ProfileKind::Moderate => "moderate",
            ProfileKind::Conservative => "conservative",
        }
    }

    /// Draw a profile with the 20/60/20 population split
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen_range(0.0..1.0);
        if roll < 0.20 {
            ProfileKind::Aggressive
        } else if roll < 0.80 {
            ProfileKind::Moderate
        } else {
            ProfileKind::Conservative
        }
    }
}

/// Action weights and idle pacing for one actor
#[derive(Debug, Clone)]
pub struct BehaviorProfile {
    pub kind: ProfileKind,
    weights: [(ActorAction, f64); 5],
    idle_ms: (u64, u64),
}

impl BehaviorProfile {
    pub fn for_kind(kind: ProfileKind) -> Self {
        let (weights, idle_ms) = match kind {
            ProfileKind::Aggressive => (
                [
                    (ActorAction::Submit, 40.0),
                    (ActorAction::Leaderboard, 20.0),
                    (ActorAction::SwitchProblem, 10.0),
                    (ActorAction::ViewProblem, 15.0),
                    (ActorAction::CheckSubmissions, 15.0),
                ],
                (500, 2_000),
            ),
            ProfileKind::Moderate => (
                [
                    (ActorAction::Submit, 25.0),
                    (ActorAction::Leaderboard, 25.0),
                    (ActorAction::SwitchProblem, 15.0),
                    (ActorAction::ViewProblem, 20.0),
                    (ActorAction::CheckSubmissions, 15.0),
                ],
                (2_000, 5_000),
            ),
            ProfileKind::Conservative => (
                [
                    (ActorAction::Submit, 10.0),
                    (ActorAction::Leaderboard, 30.0),
                    (ActorAction::SwitchProblem, 15.0),
                    (ActorAction::ViewProblem, 30.0),
                    (ActorAction::CheckSubmissions, 15.0),
                ],
                (5_000, 10_000),
            ),
        };

        Self {
            kind,
            weights,
            idle_ms,
        }
    }

    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::for_kind(ProfileKind::draw(rng))
    }

    /// Selection table with the submit weight scaled by the contest-phase
    /// multiplier
    pub fn action_table(&self, submit_multiplier: f64) -> WeightedChoice<ActorAction> {
        let items = self
            .weights
            .iter()
            .map(|(action, weight)| {
                let weight = if *action == ActorAction::Submit {
                    weight * submit_multiplier
                } else {
                    *weight
                };
                (*action, weight)
            })
            .collect();

        WeightedChoice::new(items).expect("profile weights have positive total")
    }

    pub fn idle_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(self.idle_ms.0..=self.idle_ms.1))
    }
}
