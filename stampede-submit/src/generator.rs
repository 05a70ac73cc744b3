//! The submission flood component
//!
//! Runs one smoke-test submission before any worker spawns, then paces the
//! pool at the configured aggregate rate until the stop signal fires.

use crate::pacing::{per_worker_rate, worker_delay};
use crate::worker::SubmissionWorker;
use async_trait::async_trait;
use chrono::Utc;
use stampede_config::SubmissionsConfig;
use stampede_core::selection::seeded_rng;
use stampede_core::shutdown::drain_with_grace;
use stampede_core::{
    Capabilities, ComponentError, ComponentReport, EventAggregator, LoadComponent, StopSignal,
    WorkerEvent,
};
use stampede_fixtures::{CodeVariant, FixtureSet};
use stampede_http::{PlatformApi, SubmissionRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{info, warn};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

pub struct SubmissionLoadGenerator {
    config: SubmissionsConfig,
    seed: Option<u64>,
    grace: Duration,
    api: Arc<dyn PlatformApi>,
    fixtures: Arc<FixtureSet>,
}

impl SubmissionLoadGenerator {
    pub fn new(
        config: SubmissionsConfig,
        seed: Option<u64>,
        grace: Duration,
        api: Arc<dyn PlatformApi>,
        fixtures: Arc<FixtureSet>,
    ) -> Self {
        Self {
            config,
            seed,
            grace,
            api,
            fixtures,
        }
    }

    /// One synchronous submission proving the endpoint accepts our
    /// payloads before the flood starts
    async fn smoke_test(&self) -> Result<(), ComponentError> {
        let mut rng = seeded_rng(self.seed, 0);
        let identity = self.fixtures.random_identity(&mut rng).clone();
        let problem_id = self.fixtures.random_problem(&mut rng).id;
        let language = self.fixtures.random_language(&mut rng).to_string();
        let sample = self
            .fixtures
            .random_sample(&mut rng, &language, CodeVariant::Correct)
            .clone();

        let request = SubmissionRequest {
            problem_id,
            language: sample.language,
            source: sample.source,
        };

        let response = self
            .api
            .create_submission(&identity.token, &request)
            .await
            .map_err(|error| {
                ComponentError::Setup(format!("smoke-test submission failed: {error}"))
            })?;

        if !response.ok() {
            return Err(ComponentError::Setup(format!(
                "smoke-test submission rejected with http {}",
                response.status
            )));
        }

        info!("smoke-test submission accepted");
        Ok(())
    }
}

#[async_trait]
impl LoadComponent for SubmissionLoadGenerator {
    fn name(&self) -> &'static str {
        "submissions"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            drives_network_load: true,
            ..Default::default()
        }
    }

    async fn run(&mut self, mut stop: StopSignal) -> Result<ComponentReport, ComponentError> {
        self.smoke_test().await?;

        let mut report = ComponentReport::new(self.name());

        let rate = per_worker_rate(self.config.rate_per_sec, self.config.workers);
        let delay = worker_delay(rate);

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
                    _ = progress.tick() => aggregator.log_progress("submissions"),
                }
            }
            aggregator
        });

        let mut workers: JoinSet<()> = JoinSet::new();
        for index in 0..self.config.workers {
            let worker = SubmissionWorker::new(
                index,
                self.seed,
                Arc::clone(&self.api),
                Arc::clone(&self.fixtures),
                &self.config.mix,
                delay,
                tx.clone(),
            );
            workers.spawn(worker.run(stop.clone()));
        }
        drop(tx);

        info!(
            workers = self.config.workers,
            rate_per_sec = self.config.rate_per_sec,
            per_worker_rate = rate,
            "submission flood running"
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
                            warn!(%error, "worker task did not finish cleanly");
                        }
                        Some(_) => {}
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
