//! One paced submission worker
//!
//! A worker owns its RNG, variant table, and local counters. Every
//! iteration draws a fresh identity, problem, language, and correctness
//! variant, creates one submission, and reports the outcome over the
//! event channel. Local counters get flushed as an authoritative
//! `WorkerStats` when the loop exits.

use rand::rngs::StdRng;
use stampede_config::domains::submissions::VariantMix;
use stampede_core::selection::{seeded_rng, WeightedChoice};
use stampede_core::{StopSignal, UnitStats, WorkerEvent};
use stampede_fixtures::{CodeVariant, FixtureSet};
use stampede_http::{PlatformApi, SubmissionRequest};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Selection table over the configured correctness mix
pub fn variant_table(mix: &VariantMix) -> WeightedChoice<CodeVariant> {
    WeightedChoice::new(vec![
        (CodeVariant::Correct, mix.correct),
        (CodeVariant::WrongAnswer, mix.wrong_answer),
        (CodeVariant::CompileError, mix.compile_error),
        (CodeVariant::Timeout, mix.timeout),
    ])
    .expect("variant mix was validated at load")
}

pub struct SubmissionWorker {
    id: String,
    rng: StdRng,
    api: Arc<dyn PlatformApi>,
    fixtures: Arc<FixtureSet>,
    variants: WeightedChoice<CodeVariant>,
    delay: Duration,
    events: mpsc::Sender<WorkerEvent>,
}

impl SubmissionWorker {
    pub fn new(
        index: usize,
        seed: Option<u64>,
        api: Arc<dyn PlatformApi>,
        fixtures: Arc<FixtureSet>,
        mix: &VariantMix,
        delay: Duration,
        events: mpsc::Sender<WorkerEvent>,
    ) -> Self {
        Self {
            id: format!("worker-{index}"),
            rng: seeded_rng(seed, index as u64 + 1),
            api,
            fixtures,
            variants: variant_table(mix),
            delay,
            events,
        }
    }

    pub async fn run(mut self, mut stop: StopSignal) {
        let mut stats = UnitStats::new(&self.id);

        loop {
            if stop.is_stopped() {
                break;
            }

            self.iteration(&mut stats).await;

            tokio::select! {
                _ = tokio::time::sleep(self.delay) => {}
                _ = stop.wait() => break,
            }
        }

        let _ = self.events.send(WorkerEvent::WorkerStats { stats }).await;
    }

    async fn iteration(&mut self, stats: &mut UnitStats) {
        let identity = self.fixtures.random_identity(&mut self.rng).clone();
        let problem_id = self.fixtures.random_problem(&mut self.rng).id;
        let language = self.fixtures.random_language(&mut self.rng).to_string();
        let variant = *self.variants.pick(&mut self.rng);
        let sample = self
            .fixtures
            .random_sample(&mut self.rng, &language, variant)
            .clone();

        let request = SubmissionRequest {
            problem_id,
            language: sample.language,
            source: sample.source,
        };

        let started = Instant::now();
        let result = self.api.create_submission(&identity.token, &request).await;
        let elapsed = started.elapsed().as_millis() as u64;

        let event = match result {
            Ok(response) if response.ok() => {
                stats.record(elapsed, true);
                let verdict = response.body["verdict"]
                    .as_str()
                    .unwrap_or("pending")
                    .to_string();
                WorkerEvent::SubmissionCompleted {
                    unit_id: self.id.clone(),
                    response_time_ms: elapsed,
                    language: request.language.clone(),
                    problem_id,
                    verdict,
                }
            }

            Ok(response) => {
                stats.record(elapsed, false);
                WorkerEvent::SubmissionFailed {
                    unit_id: self.id.clone(),
                    response_time_ms: elapsed,
                    error: format!("submission rejected with http {}", response.status),
                }
            }

            Err(error) => {
                stats.record(elapsed, false);
                WorkerEvent::SubmissionFailed {
                    unit_id: self.id.clone(),
                    response_time_ms: elapsed,
                    error: error.to_string(),
                }
            }
        };

        // A gone receiver means the run is tearing down
        let _ = self.events.send(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampede_core::StopController;
    use stampede_fixtures::{CodeSample, Identity, Problem};
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
        let samples = vec![
            CodeSample {
                language: "rust".into(),
                variant: CodeVariant::Correct,
                source: "fn main() {}".into(),
            },
            CodeSample {
                language: "rust".into(),
                variant: CodeVariant::WrongAnswer,
                source: "fn main() { panic!() }".into(),
            },
        ];
        Arc::new(FixtureSet::from_parts(identities, problems, samples).unwrap())
    }

    #[test]
    fn test_variant_table_respects_all_correct_mix() {
        let table = variant_table(&VariantMix::all_correct());
        let mut rng = seeded_rng(Some(1), 0);
        for _ in 0..200 {
            assert_eq!(*table.pick(&mut rng), CodeVariant::Correct);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_flushes_stats_on_stop() {
        let api = Arc::new(MockPlatform::new());
        let (tx, mut rx) = mpsc::channel(256);
        let controller = StopController::new();
        let signal = controller.subscribe();

        let worker = SubmissionWorker::new(
            0,
            Some(42),
            api,
            fixtures(),
            &VariantMix::default(),
            Duration::from_millis(100),
            tx,
        );

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            controller.signal();
        });
        worker.run(signal).await;

        let mut completed = 0;
        let mut stats = None;
        while let Some(event) = rx.recv().await {
            match event {
                WorkerEvent::SubmissionCompleted { .. } => completed += 1,
                WorkerEvent::WorkerStats { stats: flushed } => stats = Some(flushed),
                other => panic!("unexpected event {:?}", other),
            }
        }

        let stats = stats.expect("worker flushes stats at exit");
        assert!(completed > 0);
        assert_eq!(stats.totals.total, completed);
        assert_eq!(stats.totals.failed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_reports_failed_submissions() {
        let api = Arc::new(MockPlatform::new().with_failing_submissions());
        let (tx, mut rx) = mpsc::channel(256);
        let controller = StopController::new();
        let signal = controller.subscribe();

        let worker = SubmissionWorker::new(
            0,
            Some(42),
            api,
            fixtures(),
            &VariantMix::default(),
            Duration::from_millis(100),
            tx,
        );

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            controller.signal();
        });
        worker.run(signal).await;

        let mut failures = 0;
        while let Some(event) = rx.recv().await {
            if let WorkerEvent::SubmissionFailed { error, .. } = event {
                assert!(error.contains("500"));
                failures += 1;
            }
        }
        assert!(failures > 0);
    }
}
