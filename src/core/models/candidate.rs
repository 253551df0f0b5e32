use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Insert {
    pub name: String,
    pub category_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub category_id_eq: Option<i32>,
}
