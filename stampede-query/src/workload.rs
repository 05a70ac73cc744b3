//! Query mix and parameter generation
//!
//! Category first (weighted), then a concrete statement inside the
//! category, then parameters: existing seed-range ids for reads,
//! uniqueness-tokened values for writes so inserts never collide.

use crate::schema::{SEED_CONTESTS, SEED_PROBLEMS, SEED_SUBMISSIONS, SEED_TEAMS};
use rand::Rng;
use stampede_core::selection::WeightedChoice;

/// The workload's query families with their mix weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCategory {
    Leaderboard,
    Submission,
    Problem,
    Team,
    Contest,
    Insert,
    Update,
    ComplexJoin,
}

impl QueryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Leaderboard => "leaderboard",
            QueryCategory::Submission => "submission",
            QueryCategory::Problem => "problem",
            QueryCategory::Team => "team",
            QueryCategory::Contest => "contest",
            QueryCategory::Insert => "insert",
            QueryCategory::Update => "update",
            QueryCategory::ComplexJoin => "complex_join",
        }
    }

    fn weight(&self) -> f64 {
        match self {
            QueryCategory::Leaderboard => 25.0,
            QueryCategory::Submission => 30.0,
            QueryCategory::Problem => 15.0,
            QueryCategory::Team => 10.0,
            QueryCategory::Contest => 5.0,
            QueryCategory::Insert => 10.0,
            QueryCategory::Update => 3.0,
            QueryCategory::ComplexJoin => 2.0,
        }
    }

    const ALL: [QueryCategory; 8] = [
        QueryCategory::Leaderboard,
        QueryCategory::Submission,
        QueryCategory::Problem,
        QueryCategory::Team,
        QueryCategory::Contest,
        QueryCategory::Insert,
        QueryCategory::Update,
        QueryCategory::ComplexJoin,
    ];
}

/// A bindable query parameter
#[derive(Debug, Clone)]
pub enum Param {
    Int(i64),
    Text(String),
}

/// One ready-to-execute statement
#[derive(Debug, Clone)]
pub struct QueryStatement {
    pub category: QueryCategory,
    pub sql: &'static str,
    pub params: Vec<Param>,
    pub is_write: bool,
}

/// Draws statements according to the configured category mix
#[derive(Debug, Clone)]
pub struct Workload {
    categories: WeightedChoice<QueryCategory>,
}

impl Workload {
    pub fn new() -> Self {
        let categories = WeightedChoice::new(
            QueryCategory::ALL
                .iter()
                .map(|category| (*category, category.weight()))
                .collect(),
        )
        .expect("category weights are positive");

        Self { categories }
    }

    /// Draw one statement. `connection` and `iteration` feed the
    /// uniqueness token for write parameters.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        connection: usize,
        iteration: u64,
    ) -> QueryStatement {
        let category = *self.categories.pick(rng);

        match category {
            QueryCategory::Leaderboard => read(category, match rng.gen_range(0..2) {
                0 => {
                    "SELECT t.id, t.name, COUNT(s.id) AS solved
                     FROM teams t
                     LEFT JOIN submissions s ON s.team_id = t.id AND s.verdict = 'accepted'
                     GROUP BY t.id
                     ORDER BY solved DESC
                     LIMIT 50"
                }
                _ => {
                    "SELECT t.id, t.name, COUNT(s.id) AS attempts
                     FROM teams t
                     LEFT JOIN submissions s ON s.team_id = t.id
                     GROUP BY t.id
                     ORDER BY attempts DESC
                     LIMIT 50"
                }
            }, vec![]),

            QueryCategory::Submission => match rng.gen_range(0..2) {
                0 => read(
                    category,
                    "SELECT * FROM submissions WHERE team_id = ? ORDER BY created_at DESC LIMIT 20",
                    vec![Param::Int(rng.gen_range(1..=SEED_TEAMS))],
                ),
                _ => read(
                    category,
                    "SELECT * FROM submissions WHERE id = ?",
                    vec![Param::Int(rng.gen_range(1..=SEED_SUBMISSIONS))],
                ),
            },

            QueryCategory::Problem => read(
                category,
                "SELECT * FROM problems WHERE id = ?",
                vec![Param::Int(rng.gen_range(1..=SEED_PROBLEMS))],
            ),

            QueryCategory::Team => read(
                category,
                "SELECT * FROM teams WHERE id = ?",
                vec![Param::Int(rng.gen_range(1..=SEED_TEAMS))],
            ),

            QueryCategory::Contest => read(
                category,
                "SELECT * FROM contests WHERE id = ?",
                vec![Param::Int(rng.gen_range(1..=SEED_CONTESTS))],
            ),

            QueryCategory::Insert => QueryStatement {
                category,
                sql: "INSERT INTO submissions (team_id, problem_id, language, source)
                      VALUES (?, ?, ?, ?)",
                params: vec![
                    Param::Int(rng.gen_range(1..=SEED_TEAMS)),
                    Param::Int(rng.gen_range(1..=SEED_PROBLEMS)),
                    Param::Text("rust".to_string()),
                    Param::Text(format!("// load c{connection}-i{iteration}\nfn main() {{}}")),
                ],
                is_write: true,
            },

            QueryCategory::Update => QueryStatement {
                category,
                sql: "UPDATE submissions SET verdict = ? WHERE id = ?",
                params: vec![
                    Param::Text("accepted".to_string()),
                    Param::Int(rng.gen_range(1..=SEED_SUBMISSIONS)),
                ],
                is_write: true,
            },

            QueryCategory::ComplexJoin => read(
                category,
                "SELECT t.name, p.title, COUNT(*) AS tries
                 FROM submissions s
                 JOIN teams t ON t.id = s.team_id
                 JOIN problems p ON p.id = s.problem_id
                 WHERE s.verdict = ?
                 GROUP BY t.id, p.id
                 ORDER BY tries DESC
                 LIMIT 25",
                vec![Param::Text("accepted".to_string())],
            ),
        }
    }
}

impl Default for Workload {
    fn default() -> Self {
        Self::new()
    }
}

fn read(category: QueryCategory, sql: &'static str, params: Vec<Param>) -> QueryStatement {
    QueryStatement {
        category,
        sql,
        params,
        is_write: false,
    }
}
