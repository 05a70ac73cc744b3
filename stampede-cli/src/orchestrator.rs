//! Run orchestration
//!
//! Preflight checks happen before any component spawns: the platform
//! must answer its health endpoint and the fixture pools must load. A
//! failure there aborts with a setup classification and a non-zero exit,
//! with no load ever generated. After preflight, every selected
//! component runs to the shared stop signal and the merged report is
//! persisted whatever the individual outcomes.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use stampede_actors::ActorPopulationManager;
use stampede_config::StampedeConfig;
use stampede_core::{ComponentError, ComponentReport, LoadComponent, StopController};
use stampede_fixtures::FixtureSet;
use stampede_http::{PlatformApi, PlatformClient};
use stampede_monitor::ResourceHealthMonitor;
use stampede_query::QueryLoadGenerator;
use stampede_report::{export_timeseries, write_json, RunReport};
use stampede_submit::SubmissionLoadGenerator;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Which components this invocation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    Actors,
    Submissions,
    Queries,
    Monitor,
}

impl Selection {
    fn wants(&self, component: Selection, enabled: bool) -> bool {
        match self {
            Selection::All => enabled,
            only => *only == component,
        }
    }
}

/// The outcome the process exit code is derived from
pub struct RunOutcome {
    pub report: RunReport,
    pub setup_failure: Option<String>,
}

pub async fn run(config: StampedeConfig, selection: Selection) -> Result<RunOutcome> {
    let started_at = Utc::now();
    let seed = config.run.seed;
    let grace = config.run.grace_period;

    let run_actors = selection.wants(Selection::Actors, config.actors.enabled);
    let run_submissions = selection.wants(Selection::Submissions, config.submissions.enabled);
    let run_queries = selection.wants(Selection::Queries, config.queries.enabled);
    let run_monitor = selection.wants(Selection::Monitor, config.monitor.enabled);

    if !(run_actors || run_submissions || run_queries || run_monitor) {
        bail!("nothing to run: every selected component is disabled");
    }

    let api: Arc<dyn PlatformApi> = Arc::new(
        PlatformClient::new(&config.target).context("building platform client")?,
    );

    // Preflight: reachability, then fixtures for the components that need them
    let probe = api
        .health()
        .await
        .context("preflight health probe failed; is the platform running?")?;
    if !probe.ok() {
        bail!(
            "preflight health probe answered http {}; refusing to start the run",
            probe.status
        );
    }

    let needs_fixtures = run_actors || run_submissions;
    let fixtures = if needs_fixtures {
        Some(Arc::new(
            FixtureSet::load(&config.target.fixture_path).context("loading fixtures")?,
        ))
    } else {
        None
    };

    let mut components: Vec<Box<dyn LoadComponent>> = Vec::new();

    if run_actors {
        let fixtures = fixtures.clone().expect("fixtures loaded for actors");
        let mut manager = ActorPopulationManager::new(
            config.actors.clone(),
            seed,
            grace,
            Arc::clone(&api),
            fixtures,
        );
        if !config.target.realtime_url.is_empty() {
            manager = manager.with_realtime(config.target.realtime_url.clone());
        }
        components.push(Box::new(manager));
    }

    if run_submissions {
        let fixtures = fixtures.clone().expect("fixtures loaded for submissions");
        components.push(Box::new(SubmissionLoadGenerator::new(
            config.submissions.clone(),
            seed,
            grace,
            Arc::clone(&api),
            fixtures,
        )));
    }

    if run_queries {
        components.push(Box::new(QueryLoadGenerator::new(
            config.queries.clone(),
            seed,
            grace,
        )));
    }

    if run_monitor {
        components.push(Box::new(ResourceHealthMonitor::new(
            config.monitor.clone(),
            Arc::clone(&api),
        )));
    }

    info!(
        components = components.len(),
        duration_secs = config.run.duration.as_secs(),
        seed = seed.map(|s| s.to_string()).unwrap_or_else(|| "entropy".to_string()),
        "starting run"
    );

    let controller = Arc::new(StopController::new());

    let timer = {
        let controller = Arc::clone(&controller);
        let duration = config.run.duration;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => info!("run duration elapsed"),
                _ = tokio::signal::ctrl_c() => info!("interrupt received, stopping run"),
            }
            controller.signal();
        })
    };

    let mut set: JoinSet<(&'static str, Result<ComponentReport, ComponentError>)> =
        JoinSet::new();
    for mut component in components {
        let signal = controller.subscribe();
        set.spawn(async move {
            let name = component.name();
            (name, component.run(signal).await)
        });
    }

    let mut reports = Vec::new();
    let mut setup_failure = None;

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, Ok(report))) => {
                info!(component = name, requests = report.totals.total, "component finished");
                reports.push(report);
            }
            Ok((name, Err(err))) => {
                error!(component = name, error = %err, "component failed");
                let mut report = ComponentReport::new(name);
                report.completed = false;
                report.errors.push(err.to_string());
                reports.push(report);

                // A setup failure ends the whole run early
                if matches!(err, ComponentError::Setup(_)) {
                    setup_failure = Some(format!("{name}: {err}"));
                    controller.signal();
                }
            }
            Err(join_error) => {
                error!(error = %join_error, "component task panicked");
                setup_failure.get_or_insert_with(|| join_error.to_string());
            }
        }
    }

    // Everything is done; the timer has nothing left to stop
    controller.signal();
    timer.abort();

    reports.sort_by(|a, b| a.component.cmp(&b.component));
    let report = RunReport::build(&config, started_at, reports);

    let json_path = write_json(&report, &config.output.directory)?;
    if let Some(monitor) = report.component("monitor") {
        if !monitor.samples.is_empty() {
            let csv_path = config.output.directory.join(format!(
                "stampede-timeseries-{}.csv",
                report.generated_at.format("%Y%m%d-%H%M%S")
            ));
            export_timeseries(&monitor.samples, &csv_path)?;
            info!(path = %csv_path.display(), "time series exported");
        }
    }

    if config.output.console {
        stampede_report::console::print_summary(&report);
    }

    if !report.all_completed() {
        warn!("one or more components did not complete; see {}", json_path.display());
    }

    Ok(RunOutcome {
        report,
        setup_failure,
    })
}
