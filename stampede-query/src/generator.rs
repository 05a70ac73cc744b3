//! The query load component
//!
//! Owns the isolated working copy for its whole lifetime: temp directory,
//! optional copy of a source datastore, schema bootstrap, the connection
//! pool, and removal on every exit path (the temp directory is cleaned by
//! drop even when the run errors).

use crate::schema;
use crate::workload::{Param, QueryStatement, Workload};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use stampede_config::QueriesConfig;
use stampede_core::selection::seeded_rng;
use stampede_core::{
    Capabilities, ComponentError, ComponentReport, EventAggregator, LoadComponent,
    ResponseTimeStats, StopSignal, UnitStats, WorkerEvent,
};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

pub struct QueryLoadGenerator {
    config: QueriesConfig,
    seed: Option<u64>,
    grace: Duration,
}

impl QueryLoadGenerator {
    pub fn new(config: QueriesConfig, seed: Option<u64>, grace: Duration) -> Self {
        Self {
            config,
            seed,
            grace,
        }
    }

    async fn prepare_datastore(
        &self,
    ) -> Result<(tempfile::TempDir, SqlitePool), ComponentError> {
        let dir = tempfile::tempdir()
            .map_err(|error| ComponentError::Setup(format!("temp dir: {error}")))?;
        let path = dir.path().join("stampede.db");

        if let Some(source) = &self.config.source_path {
            std::fs::copy(source, &path).map_err(|error| {
                ComponentError::Setup(format!(
                    "copying datastore {}: {error}",
                    source.display()
                ))
            })?;
            info!(source = %source.display(), "working on an isolated datastore copy");
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(self.config.connections.max(1) as u32)
            .connect_with(options)
            .await
            .map_err(|error| ComponentError::Setup(format!("opening datastore: {error}")))?;

        schema::bootstrap(&pool)
            .await
            .map_err(|error| ComponentError::Setup(format!("bootstrapping schema: {error}")))?;

        Ok((dir, pool))
    }
}

#[async_trait]
impl LoadComponent for QueryLoadGenerator {
    fn name(&self) -> &'static str {
        "queries"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            drives_datastore_load: true,
            ..Default::default()
        }
    }

    async fn run(&mut self, mut stop: StopSignal) -> Result<ComponentReport, ComponentError> {
        // `_dir` must outlive the pool; dropping it removes the datastore
        let (_dir, pool) = self.prepare_datastore().await?;

        let mut report = ComponentReport::new(self.name());

        let (tx, mut rx) = mpsc::channel::<WorkerEvent>(1024);
        let mut workers: JoinSet<()> = JoinSet::new();

        for connection in 0..self.config.connections {
            workers.spawn(connection_loop(
                connection,
                pool.clone(),
                self.seed,
                self.config.queries_per_connection,
                tx.clone(),
                stop.clone(),
            ));
        }
        drop(tx);

        info!(
            connections = self.config.connections,
            queries_per_connection = self.config.queries_per_connection,
            "query load running"
        );

        let mut aggregator = EventAggregator::new();
        let mut categories: BTreeMap<String, ResponseTimeStats> = BTreeMap::new();
        let mut stopping = false;
        let mut deadline: Option<tokio::time::Instant> = None;
        let mut progress = tokio::time::interval(PROGRESS_INTERVAL);
        progress.reset();

        loop {
            tokio::select! {
                maybe = rx.recv() => match maybe {
                    Some(event) => {
                        if let WorkerEvent::ActionCompleted { action, response_time_ms, .. } = &event {
                            categories
                                .entry(action.to_string())
                                .or_default()
                                .record(*response_time_ms);
                        }
                        aggregator.apply(event);
                    }
                    // All connections done and flushed
                    None => break,
                },
                _ = stop.wait(), if !stopping => {
                    stopping = true;
                    deadline = Some(tokio::time::Instant::now() + self.grace);
                }
                _ = async { tokio::time::sleep_until(deadline.unwrap()).await }, if deadline.is_some() => {
                    workers.abort_all();
                    deadline = None;
                }
                _ = progress.tick() => aggregator.log_progress("queries"),
            }
        }
        while let Some(finished) = workers.join_next().await {
            if let Err(error) = finished {
                if !error.is_cancelled() {
                    warn!(%error, "connection task did not finish cleanly");
                }
            }
        }

        pool.close().await;
        debug!("datastore pool closed");

        aggregator.finish(&mut report);
        report.extra.insert(
            "categories".to_string(),
            serde_json::to_value(&categories).unwrap_or_default(),
        );
        report.finished_at = Utc::now();

        Ok(report)
    }
}

async fn connection_loop(
    connection: usize,
    pool: SqlitePool,
    seed: Option<u64>,
    limit: u64,
    events: mpsc::Sender<WorkerEvent>,
    mut stop: StopSignal,
) {
    let workload = Workload::new();
    let mut rng = seeded_rng(seed, connection as u64 + 1);
    let id = format!("connection-{connection}");
    let mut stats = UnitStats::new(&id);

    // Each loop holds its own physical connection for the whole run
    let mut conn = match pool.acquire().await {
        Ok(conn) => conn,
        Err(error) => {
            warn!(connection = %id, %error, "could not acquire a dedicated connection");
            let _ = events.send(WorkerEvent::WorkerStats { stats }).await;
            return;
        }
    };

    for iteration in 0..limit {
        if stop.is_stopped() {
            break;
        }

        let statement = workload.draw(&mut rng, connection, iteration);
        let started = Instant::now();
        let result = execute(&mut conn, &statement).await;
        let elapsed = started.elapsed().as_millis() as u64;

        let success = match result {
            Ok(()) => true,
            Err(error) => {
                warn!(connection = %id, category = statement.category.as_str(), %error, "query failed");
                false
            }
        };
        stats.record(elapsed, success);

        let event = WorkerEvent::ActionCompleted {
            unit_id: id.clone(),
            action: statement.category.as_str(),
            response_time_ms: elapsed,
            success,
        };
        if events.send(event).await.is_err() {
            break;
        }

        let jitter = Duration::from_millis(rng.gen_range(0..=10));
        tokio::select! {
            _ = tokio::time::sleep(jitter) => {}
            _ = stop.wait() => break,
        }
    }

    let _ = events.send(WorkerEvent::WorkerStats { stats }).await;
}

async fn execute(
    conn: &mut SqliteConnection,
    statement: &QueryStatement,
) -> Result<(), sqlx::Error> {
    let mut query = sqlx::query(statement.sql);
    for param in &statement.params {
        query = match param {
            Param::Int(value) => query.bind(*value),
            Param::Text(value) => query.bind(value.as_str()),
        };
    }

    if statement.is_write {
        query.execute(&mut *conn).await?;
    } else {
        query.fetch_all(&mut *conn).await?;
    }
    Ok(())
}
