//! One virtual team
//!
//! An actor owns all of its mutable state: RNG, behavior profile, focused
//! problem, contest-phase submit multiplier, and the receiving end of its
//! realtime feed. It reports every HTTP action over the worker-event
//! channel and never touches shared counters.

use crate::events::{ContestPhase, RealtimeEvent};
use crate::profile::{ActorAction, BehaviorProfile, ProfileKind};
use rand::rngs::StdRng;
use rand::Rng;
use stampede_config::ActorsConfig;
use stampede_core::selection::{roll, seeded_rng};
use stampede_core::{StopSignal, WorkerEvent};
use stampede_fixtures::{CodeVariant, FixtureSet, Identity, Problem};
use stampede_http::{ApiError, ApiResponse, PlatformApi, SubmissionRequest};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Lifecycle of one actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    Idle,
    Connecting,
    Authenticated,
    ActionLoop,
    Stopping,
    Stopped,
}

pub struct VirtualActor {
    id: String,
    identity: Identity,
    profile: BehaviorProfile,
    rng: StdRng,
    api: Arc<dyn PlatformApi>,
    fixtures: Arc<FixtureSet>,
    leaderboard_check_probability: f64,
    resubmit_probability: f64,
    events: mpsc::Sender<WorkerEvent>,
    realtime: Option<mpsc::Receiver<RealtimeEvent>>,
    state: ActorState,
    submit_multiplier: f64,
    focused_problem: Problem,
}

impl VirtualActor {
    pub fn new(
        index: usize,
        identity: Identity,
        config: &ActorsConfig,
        seed: Option<u64>,
        api: Arc<dyn PlatformApi>,
        fixtures: Arc<FixtureSet>,
        events: mpsc::Sender<WorkerEvent>,
        realtime: Option<mpsc::Receiver<RealtimeEvent>>,
    ) -> Self {
        let mut rng = seeded_rng(seed, index as u64 + 1);
        let profile = BehaviorProfile::draw(&mut rng);
        let focused_problem = fixtures.random_problem(&mut rng).clone();

        Self {
            id: format!("actor-{index}"),
            identity,
            profile,
            rng,
            api,
            fixtures,
            leaderboard_check_probability: config.leaderboard_check_probability,
            resubmit_probability: config.resubmit_probability,
            events,
            realtime,
            state: ActorState::Idle,
            submit_multiplier: 1.0,
            focused_problem,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn profile_kind(&self) -> ProfileKind {
        self.profile.kind
    }

    pub async fn run(mut self, mut stop: StopSignal) {
        self.state = ActorState::Connecting;

        let started = Instant::now();
        let auth = self.api.auth_status(&self.identity.token).await;
        let authenticated = matches!(&auth, Ok(response) if response.ok());
        self.report("auth", elapsed_ms(started), authenticated).await;

        // A bad credential takes out this actor only
        if !authenticated {
            warn!(actor = %self.id, team = self.identity.team_id, "authentication failed");
            self.state = ActorState::Stopped;
            return;
        }

        self.state = ActorState::Authenticated;
        debug!(
            actor = %self.id,
            team = self.identity.team_id,
            profile = self.profile.kind.as_str(),
            "actor online"
        );

        self.state = ActorState::ActionLoop;
        loop {
            if stop.is_stopped() {
                break;
            }

            let action = *self
                .profile
                .action_table(self.submit_multiplier)
                .pick(&mut self.rng);
            self.perform(action).await;
            if self.state == ActorState::Stopping {
                break;
            }

            let idle = self.profile.idle_delay(&mut self.rng);
            self.idle(idle, &mut stop).await;
            if self.state == ActorState::Stopping {
                break;
            }
        }

        self.state = ActorState::Stopped;
        debug!(actor = %self.id, "actor stopped");
    }

    async fn perform(&mut self, action: ActorAction) {
        match action {
            ActorAction::Submit => self.submit().await,

            ActorAction::Leaderboard => {
                let started = Instant::now();
                let result = self.api.leaderboard(&self.identity.token).await;
                self.report_result("leaderboard", started, &result).await;
            }

            ActorAction::SwitchProblem => {
                self.focused_problem = self.fixtures.random_problem(&mut self.rng).clone();
                let started = Instant::now();
                let result = self
                    .api
                    .problem(&self.identity.token, self.focused_problem.id)
                    .await;
                self.report_result("switch_problem", started, &result).await;
            }

            ActorAction::ViewProblem => {
                let started = Instant::now();
                let result = self
                    .api
                    .problem(&self.identity.token, self.focused_problem.id)
                    .await;
                self.report_result("view_problem", started, &result).await;
            }

            ActorAction::CheckSubmissions => {
                let started = Instant::now();
                let result = self
                    .api
                    .submissions(&self.identity.token, self.identity.team_id)
                    .await;
                self.report_result("check_submissions", started, &result).await;
            }
        }
    }

    async fn submit(&mut self) {
        let language = self.fixtures.random_language(&mut self.rng).to_string();
        let sample = self
            .fixtures
            .random_sample(&mut self.rng, &language, CodeVariant::Correct)
            .clone();

        let request = SubmissionRequest {
            problem_id: self.focused_problem.id,
            language: sample.language,
            source: sample.source,
        };

        let started = Instant::now();
        let result = self.api.create_submission(&self.identity.token, &request).await;
        self.report_result("submit", started, &result).await;
    }

    /// Idle between actions, reacting to realtime events as they arrive
    async fn idle(&mut self, idle: Duration, stop: &mut StopSignal) {
        let mut feed = self.realtime.take();
        let sleep = tokio::time::sleep(idle);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => break,
                _ = stop.wait() => {
                    self.state = ActorState::Stopping;
                    break;
                }
                event = feed_recv(&mut feed) => match event {
                    Some(event) => {
                        self.handle_event(event).await;
                        if self.state == ActorState::Stopping {
                            break;
                        }
                    }
                    // Feed gone for good; keep running on the action loop alone
                    None => feed = None,
                },
            }
        }

        self.realtime = feed;
    }

    async fn handle_event(&mut self, event: RealtimeEvent) {
        match event {
            RealtimeEvent::LeaderboardUpdate => {
                if roll(&mut self.rng, self.leaderboard_check_probability) {
                    let delay = Duration::from_millis(self.rng.gen_range(0..2_000));
                    tokio::time::sleep(delay).await;
                    self.perform(ActorAction::Leaderboard).await;
                }
            }

            RealtimeEvent::SubmissionUpdate { team_id, accepted } => {
                if team_id == self.identity.team_id
                    && !accepted
                    && roll(&mut self.rng, self.resubmit_probability)
                {
                    self.perform(ActorAction::Submit).await;
                }
            }

            RealtimeEvent::ContestNotification { phase } => match phase {
                ContestPhase::Started => self.submit_multiplier = 1.5,
                ContestPhase::TimeWarning => self.submit_multiplier = 2.0,
                ContestPhase::Ended => {
                    debug!(actor = %self.id, "contest ended");
                    self.state = ActorState::Stopping;
                }
            },
        }
    }

    async fn report_result(
        &self,
        action: &'static str,
        started: Instant,
        result: &Result<ApiResponse, ApiError>,
    ) {
        let success = matches!(result, Ok(response) if response.ok());
        self.report(action, elapsed_ms(started), success).await;
    }

    async fn report(&self, action: &'static str, response_time_ms: u64, success: bool) {
        let event = WorkerEvent::ActionCompleted {
            unit_id: self.id.clone(),
            action,
            response_time_ms,
            success,
        };
        // A gone receiver means the run is tearing down
        let _ = self.events.send(event).await;
    }
}

async fn feed_recv(feed: &mut Option<mpsc::Receiver<RealtimeEvent>>) -> Option<RealtimeEvent> {
    match feed {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampede_core::StopController;
    use stampede_fixtures::CodeSample;
    use stampede_http::MockPlatform;

    fn fixtures() -> Arc<FixtureSet> {
        let identities = vec![Identity {
            team_id: 1,
            name: "team-alpha".into(),
            token: "tok-alpha".into(),
        }];
        let problems = vec![Problem {
            id: 10,
            contest_id: 1,
            title: "Two Sum".into(),
        }];
        let samples = vec![CodeSample {
            language: "rust".into(),
            variant: CodeVariant::Correct,
            source: "fn main() {}".into(),
        }];
        Arc::new(FixtureSet::from_parts(identities, problems, samples).unwrap())
    }

    fn actor(
        api: Arc<dyn PlatformApi>,
        events: mpsc::Sender<WorkerEvent>,
        realtime: Option<mpsc::Receiver<RealtimeEvent>>,
    ) -> VirtualActor {
        let fixtures = fixtures();
        let identity = fixtures.identities()[0].clone();
        VirtualActor::new(
            0,
            identity,
            &ActorsConfig::default(),
            Some(42),
            api,
            fixtures,
            events,
            realtime,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_stops_the_actor_after_one_report() {
        let api = Arc::new(MockPlatform::new().with_rejected_token("tok-alpha"));
        let (tx, mut rx) = mpsc::channel(16);
        let controller = StopController::new();

        actor(api, tx, None).run(controller.subscribe()).await;

        let event = rx.recv().await.unwrap();
        match event {
            WorkerEvent::ActionCompleted {
                action, success, ..
            } => {
                assert_eq!(action, "auth");
                assert!(!success);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_contest_ended_stops_the_action_loop() {
        let api = Arc::new(MockPlatform::new());
        let (tx, mut rx) = mpsc::channel(256);
        let (feed_tx, feed_rx) = mpsc::channel(4);
        let controller = StopController::new();

        feed_tx
            .send(RealtimeEvent::ContestNotification {
                phase: ContestPhase::Ended,
            })
            .await
            .unwrap();

        actor(api, tx, Some(feed_rx)).run(controller.subscribe()).await;

        // Channel closes once the actor returns, so the loop really ended
        let mut actions = Vec::new();
        while let Some(event) = rx.recv().await {
            if let WorkerEvent::ActionCompleted { action, .. } = event {
                actions.push(action);
            }
        }
        assert_eq!(actions[0], "auth");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_submission_update_for_other_team_is_ignored() {
        let api = Arc::new(MockPlatform::new());
        let (tx, mut rx) = mpsc::channel(256);
        let (feed_tx, feed_rx) = mpsc::channel(4);
        let controller = StopController::new();

        feed_tx
            .send(RealtimeEvent::SubmissionUpdate {
                team_id: 99,
                accepted: false,
            })
            .await
            .unwrap();
        feed_tx
            .send(RealtimeEvent::ContestNotification {
                phase: ContestPhase::Ended,
            })
            .await
            .unwrap();

        actor(api, tx, Some(feed_rx)).run(controller.subscribe()).await;

        // Resubmit probability is 0.5 but the update targets another team;
        // nothing between auth and the first drawn action can be a
        // reaction submit triggered from the feed
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert!(matches!(
            events[0],
            WorkerEvent::ActionCompleted { action: "auth", .. }
        ));
    }
}
