//! Fixture data types

use serde::{Deserialize, Serialize};

/// One test identity with its pre-issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub team_id: i64,
    pub name: String,
    pub token: String,
}

/// One contest problem descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub contest_id: i64,
    pub title: String,
}

/// A code sample for one language and outcome variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSample {
    pub language: String,
    pub variant: CodeVariant,
    pub source: String,
}

/// The intended judge outcome of a code sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeVariant {
    Correct,
    WrongAnswer,
    CompileError,
    Timeout,
}

impl CodeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeVariant::Correct => "correct",
            CodeVariant::WrongAnswer => "wrong_answer",
            CodeVariant::CompileError => "compile_error",
            CodeVariant::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for CodeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
