//! The actor population component
//!
//! Spawns the configured number of actors (plus their realtime clients
//! when a feed URL is set), owns the single aggregating task for their
//! events, and drains everything within the grace period at stop.

use crate::actor::VirtualActor;
use crate::realtime;
use async_trait::async_trait;
use chrono::Utc;
use stampede_config::ActorsConfig;
use stampede_core::shutdown::drain_with_grace;
use stampede_core::{
    Capabilities, ComponentError, ComponentReport, EventAggregator, LoadComponent, StopSignal,
    WorkerEvent,
};
use stampede_fixtures::FixtureSet;
use stampede_http::PlatformApi;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{info, warn};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

pub struct ActorPopulationManager {
    config: ActorsConfig,
    seed: Option<u64>,
    grace: Duration,
    realtime_url: Option<String>,
    api: Arc<dyn PlatformApi>,
    fixtures: Arc<FixtureSet>,
}

impl ActorPopulationManager {
    pub fn new(
        config: ActorsConfig,
        seed: Option<u64>,
        grace: Duration,
        api: Arc<dyn PlatformApi>,
        fixtures: Arc<FixtureSet>,
    ) -> Self {
        Self {
            config,
            seed,
            grace,
            realtime_url: None,
            api,
            fixtures,
        }
    }

    /// Attach the realtime feed; without it actors run API actions only
    pub fn with_realtime(mut self, url: impl Into<String>) -> Self {
        self.realtime_url = Some(url.into());
        self
    }
}

#[async_trait]
impl LoadComponent for ActorPopulationManager {
    fn name(&self) -> &'static str {
        "actors"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            drives_network_load: true,
            ..Default::default()
        }
    }

    async fn run(&mut self, mut stop: StopSignal) -> Result<ComponentReport, ComponentError> {
        let mut report = ComponentReport::new(self.name());

        let (tx, mut rx) = mpsc::channel::<WorkerEvent>(1024);
        let aggregator = tokio::spawn(async move {
            let mut aggregator = EventAggregator::new();
            let mut progress = tokio::time::interval(PROGRESS_INTERVAL);
            progress.reset();
            loop {
                tokio::select! {
                    maybe = rx.recv() => match maybe {
                        Some(event) => aggregator.apply(event),
                        None => break,
                    },
                    _ = progress.tick() => aggregator.log_progress("actors"),
                }
            }
            aggregator
        });

        let mut workers: JoinSet<()> = JoinSet::new();
        let identities = self.fixtures.identities();

        for index in 0..self.config.count {
            let identity = identities[index % identities.len()].clone();

            let feed = match &self.realtime_url {
                Some(url) => {
                    let (feed_tx, feed_rx) = mpsc::channel(64);
                    workers.spawn(realtime::run_client(
                        url.clone(),
                        format!("actor-{index}"),
                        self.config.reconnect_backoff,
                        feed_tx,
                        stop.clone(),
                    ));
                    Some(feed_rx)
                }
                None => None,
            };

            let actor = VirtualActor::new(
                index,
                identity,
                &self.config,
                self.seed,
                Arc::clone(&self.api),
                Arc::clone(&self.fixtures),
                tx.clone(),
                feed,
            );
            report.count_in("profile", actor.profile_kind().as_str());
            workers.spawn(actor.run(stop.clone()));
        }
        drop(tx);

        info!(
            actors = self.config.count,
            realtime = self.realtime_url.is_some(),
            "actor population running"
        );

        loop {
            tokio::select! {
                _ = stop.wait() => {
                    drain_with_grace(&mut workers, self.grace).await;
                    break;
                }
                finished = workers.join_next() => {
                    match finished {
                        Some(Err(error)) if !error.is_cancelled() => {
                            warn!(%error, "actor task did not finish cleanly");
                        }
                        Some(_) => {}
                        // All actors gone (or count was zero)
                        None => break,
                    }
                }
            }
        }

        match aggregator.await {
            Ok(aggregator) => aggregator.finish(&mut report),
            Err(_) => report.completed = false,
        }
        report.finished_at = Utc::now();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampede_core::StopController;
    use stampede_fixtures::{CodeSample, CodeVariant, Identity, Problem};
    use stampede_http::MockPlatform;

    fn fixtures() -> Arc<FixtureSet> {
        let identities = vec![
            Identity {
                team_id: 1,
                name: "team-alpha".into(),
                token: "tok-alpha".into(),
            },
            Identity {
                team_id: 2,
                name: "team-beta".into(),
                token: "tok-beta".into(),
            },
        ];
        let problems = vec![
            Problem {
                id: 10,
                contest_id: 1,
                title: "Two Sum".into(),
            },
            Problem {
                id: 11,
                contest_id: 1,
                title: "Knapsack".into(),
            },
        ];
        let samples = vec![
            CodeSample {
                language: "rust".into(),
                variant: CodeVariant::Correct,
                source: "fn main() {}".into(),
            },
            CodeSample {
                language: "python".into(),
                variant: CodeVariant::Correct,
                source: "print(1)".into(),
            },
        ];
        Arc::new(FixtureSet::from_parts(identities, problems, samples).unwrap())
    }

    fn manager(api: Arc<dyn PlatformApi>, count: usize) -> ActorPopulationManager {
        let mut config = ActorsConfig::default();
        config.count = count;
        ActorPopulationManager::new(config, Some(42), Duration::from_secs(5), api, fixtures())
    }

    #[tokio::test(start_paused = true)]
    async fn test_population_accounts_for_every_request() {
        let api = Arc::new(MockPlatform::new().with_latency(Duration::from_millis(20)));
        let mut manager = manager(api, 3);

        let controller = StopController::new();
        let signal = controller.subscribe();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            controller.signal();
        });

        let report = manager.run(signal).await.unwrap();

        assert!(report.completed);
        assert!(report.totals.total > 0);
        assert_eq!(report.totals.failed, 0);
        assert_eq!(report.totals.success_rate_display(), "100.00%");
        assert_eq!(
            report.extra["submissions_sent"],
            report.extra["submissions_processed"]
        );
        assert_eq!(report.units.len(), 3);

        let profiles: u64 = report.distributions["profile"].values().sum();
        assert_eq!(profiles, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_actors_yield_empty_report() {
        let api = Arc::new(MockPlatform::new());
        let mut manager = manager(api, 0);

        let controller = StopController::new();
        let report = manager.run(controller.subscribe()).await.unwrap();

        assert!(report.completed);
        assert_eq!(report.totals.total, 0);
        assert!(report.units.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_limits_to_one_actor() {
        let api = Arc::new(MockPlatform::new().with_rejected_token("tok-beta"));
        let mut manager = manager(api, 2);

        let controller = StopController::new();
        let signal = controller.subscribe();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            controller.signal();
        });

        let report = manager.run(signal).await.unwrap();

        // actor-1 holds the rejected credential: exactly one failed auth
        let failed_unit = report
            .units
            .iter()
            .find(|unit| unit.id == "actor-1")
            .unwrap();
        assert_eq!(failed_unit.totals.total, 1);
        assert_eq!(failed_unit.totals.failed, 1);

        // actor-0 keeps running unaffected
        let healthy_unit = report
            .units
            .iter()
            .find(|unit| unit.id == "actor-0")
            .unwrap();
        assert!(healthy_unit.totals.total > 1);
        assert_eq!(healthy_unit.totals.failed, 0);
    }
}
