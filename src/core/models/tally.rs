use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateTally {
    pub id: i32,
    pub name: String,
    pub votes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub id: i32,
    pub name: String,
    pub candidates: Vec<CandidateTally>,
}

/// Vote counts for every candidate of every category, in catalog order.
/// Candidates without ballots are present with zero votes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub categories: Vec<CategoryTally>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub category: String,
    pub candidate: String,
    pub votes: i64,
}
