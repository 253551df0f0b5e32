use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::candidate::Candidate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Insert {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithCandidates {
    pub id: i32,
    pub name: String,
    pub candidates: Vec<Candidate>,
}

/// What a voter sees after presenting a usable code.
#[derive(Debug, Clone, Serialize)]
pub struct BallotForm {
    pub code_id: i32,
    pub categories: Vec<CategoryWithCandidates>,
}
