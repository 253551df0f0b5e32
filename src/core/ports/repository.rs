use crate::core::models::{
    ballot::{CandidateCount, Insert as BallotInsert, Query as BallotQuery},
    candidate::{Candidate, Insert as CandidateInsert, Query as CandidateQuery},
    category::{Category, Insert as CategoryInsert, Update as CategoryUpdate},
    code::{Insert as CodeInsert, Query as CodeQuery, VotingCode},
    common::Pagination,
    user::{Insert as UserInsert, User},
};
use crate::error::Error;

pub trait CodeCommon {
    /// Returns `None` when the code string is already taken.
    async fn insert(&mut self, data: CodeInsert) -> Result<Option<VotingCode>, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<VotingCode>, Error>;
    /// Like `get`, but holds a row lock until the surrounding transaction ends.
    async fn get_for_update(&mut self, id: i32) -> Result<Option<VotingCode>, Error>;
    async fn get_by_code(&mut self, code: &str) -> Result<Option<VotingCode>, Error>;
    async fn mark_used(&mut self, id: i32) -> Result<(), Error>;
    async fn query(&mut self, query: &CodeQuery, pagination: Option<Pagination>) -> Result<Vec<VotingCode>, Error>;
    async fn count(&mut self, query: &CodeQuery) -> Result<i64, Error>;
}

pub trait CategoryCommon {
    async fn insert(&mut self, data: CategoryInsert) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: CategoryUpdate) -> Result<bool, Error>;
    async fn delete(&mut self, id: i32) -> Result<bool, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Category>, Error>;
    async fn all(&mut self) -> Result<Vec<Category>, Error>;
}

pub trait CandidateCommon {
    async fn insert(&mut self, data: CandidateInsert) -> Result<i32, Error>;
    async fn delete(&mut self, id: i32) -> Result<bool, Error>;
    async fn query(&mut self, query: &CandidateQuery) -> Result<Vec<Candidate>, Error>;
}

pub trait BallotCommon {
    async fn bulk_insert(&mut self, ballots: Vec<BallotInsert>) -> Result<(), Error>;
    async fn exists_for_code(&mut self, voting_code_id: i32) -> Result<bool, Error>;
    async fn count(&mut self, query: &BallotQuery) -> Result<i64, Error>;
    /// Candidates without ballots are absent from the result.
    async fn count_by_candidate(&mut self) -> Result<Vec<CandidateCount>, Error>;
}

pub trait UserCommon {
    async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, Error>;
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
}

pub trait Common: CodeCommon + CategoryCommon + CandidateCommon + BallotCommon + UserCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Store: Store;
    type TxStore: TxStore;

    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::TxStore, Error>;
}
