use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ballot {
    pub id: i32,
    pub voting_code_id: i32,
    pub candidate_id: i32,
    pub cast_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub voting_code_id: i32,
    pub candidate_id: i32,
    pub cast_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub voting_code_id_eq: Option<i32>,
    pub candidate_id_eq: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CandidateCount {
    pub candidate_id: i32,
    pub votes: i64,
}

/// category id -> candidate id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submit {
    pub selections: HashMap<i32, i32>,
}
