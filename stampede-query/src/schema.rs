//! Working-copy schema bootstrap
//!
//! Idempotent: every table uses `IF NOT EXISTS` and every seed row
//! `INSERT OR IGNORE`, so bootstrapping a copied datastore that already
//! carries the schema is a no-op.

use sqlx::SqlitePool;

/// Seed row counts; parameter generation draws ids from these ranges
pub const SEED_TEAMS: i64 = 20;
pub const SEED_PROBLEMS: i64 = 10;
pub const SEED_CONTESTS: i64 = 2;
pub const SEED_SUBMISSIONS: i64 = 50;

const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS contests (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        starts_at TEXT NOT NULL,
        ends_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        contest_id INTEGER NOT NULL REFERENCES contests(id)
    )",
    "CREATE TABLE IF NOT EXISTS problems (
        id INTEGER PRIMARY KEY,
        contest_id INTEGER NOT NULL REFERENCES contests(id),
        title TEXT NOT NULL,
        points INTEGER NOT NULL DEFAULT 100
    )",
    "CREATE TABLE IF NOT EXISTS submissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        team_id INTEGER NOT NULL REFERENCES teams(id),
        problem_id INTEGER NOT NULL REFERENCES problems(id),
        language TEXT NOT NULL,
        source TEXT NOT NULL,
        verdict TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )",
    "CREATE INDEX IF NOT EXISTS idx_submissions_team ON submissions(team_id)",
    "CREATE INDEX IF NOT EXISTS idx_submissions_problem ON submissions(problem_id)",
];

/// Create the schema and seed rows when absent
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in TABLES {
        sqlx::query(statement).execute(pool).await?;
    }

    for id in 1..=SEED_CONTESTS {
        sqlx::query(
            "INSERT OR IGNORE INTO contests (id, name, starts_at, ends_at)
             VALUES (?, ?, datetime('now'), datetime('now', '+4 hours'))",
        )
        .bind(id)
        .bind(format!("contest-{id}"))
        .execute(pool)
        .await?;
    }

    for id in 1..=SEED_TEAMS {
        sqlx::query("INSERT OR IGNORE INTO teams (id, name, contest_id) VALUES (?, ?, ?)")
            .bind(id)
            .bind(format!("team-{id}"))
            .bind(1 + (id - 1) % SEED_CONTESTS)
            .execute(pool)
            .await?;
    }

    for id in 1..=SEED_PROBLEMS {
        sqlx::query("INSERT OR IGNORE INTO problems (id, contest_id, title) VALUES (?, ?, ?)")
            .bind(id)
            .bind(1 + (id - 1) % SEED_CONTESTS)
            .bind(format!("problem-{id}"))
            .execute(pool)
            .await?;
    }

    for id in 1..=SEED_SUBMISSIONS {
        sqlx::query(
            "INSERT OR IGNORE INTO submissions (id, team_id, problem_id, language, source, verdict)
             VALUES (?, ?, ?, 'rust', 'fn main() {}', 'accepted')",
        )
        .bind(id)
        .bind(1 + (id - 1) % SEED_TEAMS)
        .bind(1 + (id - 1) % SEED_PROBLEMS)
        .execute(pool)
        .await?;
    }

    Ok(())
}
