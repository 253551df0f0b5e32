use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::models::{
    ballot::{Ballot, CandidateCount, Insert as BallotInsert, Query as BallotQuery},
    candidate::{Candidate, Insert as CandidateInsert, Query as CandidateQuery},
    category::{Category, Insert as CategoryInsert, Update as CategoryUpdate},
    code::{Insert as CodeInsert, Query as CodeQuery, VotingCode},
    common::Pagination,
    user::{Insert as UserInsert, User},
};
use crate::core::ports::repository::{BallotCommon, CandidateCommon, CategoryCommon, CodeCommon, Common, Manager, Store, TxStore, UserCommon};
use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct State {
    codes: Vec<VotingCode>,
    categories: Vec<Category>,
    candidates: Vec<Candidate>,
    ballots: Vec<Ballot>,
    users: Vec<User>,
    last_id: i32,
    fail_mark_used: bool,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// Every store, transactional or not, holds the whole state exclusively until dropped,
/// so transactions are serialized. Transactions work on a copy that commit writes back.
#[derive(Clone, Default)]
pub struct MemoryManager {
    state: Arc<Mutex<State>>,
}

impl MemoryManager {
    /// Makes the next `mark_used` fail, to exercise rollback.
    pub async fn fail_next_mark_used(&self) {
        self.state.lock().await.fail_mark_used = true;
    }
}

pub struct MemoryStore {
    guard: OwnedMutexGuard<State>,
    staged: Option<State>,
}

impl MemoryStore {
    fn state(&mut self) -> &mut State {
        match self.staged.as_mut() {
            Some(staged) => staged,
            None => &mut *self.guard,
        }
    }

    fn code_matches(code: &VotingCode, query: &CodeQuery) -> bool {
        query.used_eq.map_or(true, |used| code.used == used) && query.code_like.as_ref().map_or(true, |like| code.code.to_lowercase().contains(&like.to_lowercase()))
    }
}

impl CodeCommon for MemoryStore {
    async fn insert(&mut self, data: CodeInsert) -> Result<Option<VotingCode>, Error> {
        let state = self.state();
        if state.codes.iter().any(|c| c.code == data.code) {
            return Ok(None);
        }
        let code = VotingCode {
            id: state.next_id(),
            code: data.code,
            used: false,
            expires_at: data.expires_at,
        };
        state.codes.push(code.clone());
        Ok(Some(code))
    }

    async fn get(&mut self, id: i32) -> Result<Option<VotingCode>, Error> {
        Ok(self.state().codes.iter().find(|c| c.id == id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<VotingCode>, Error> {
        CodeCommon::get(self, id).await
    }

    async fn get_by_code(&mut self, code: &str) -> Result<Option<VotingCode>, Error> {
        Ok(self.state().codes.iter().find(|c| c.code == code).cloned())
    }

    async fn mark_used(&mut self, id: i32) -> Result<(), Error> {
        let state = self.state();
        if state.fail_mark_used {
            // cleared on the shared state so the next transaction succeeds
            self.guard.fail_mark_used = false;
            return Err(Error::ServerError("injected failure".into()));
        }
        if let Some(code) = state.codes.iter_mut().find(|c| c.id == id) {
            code.used = true;
        }
        Ok(())
    }

    async fn query(&mut self, query: &CodeQuery, pagination: Option<Pagination>) -> Result<Vec<VotingCode>, Error> {
        let matching = self.state().codes.iter().filter(|c| Self::code_matches(c, query)).cloned();
        Ok(match pagination {
            Some(p) => matching.skip(p.offset as usize).take(p.limit as usize).collect(),
            None => matching.collect(),
        })
    }

    async fn count(&mut self, query: &CodeQuery) -> Result<i64, Error> {
        Ok(self.state().codes.iter().filter(|c| Self::code_matches(c, query)).count() as i64)
    }
}

impl CategoryCommon for MemoryStore {
    async fn insert(&mut self, data: CategoryInsert) -> Result<i32, Error> {
        let state = self.state();
        let id = state.next_id();
        state.categories.push(Category { id, name: data.name });
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: CategoryUpdate) -> Result<bool, Error> {
        match self.state().categories.iter_mut().find(|c| c.id == id) {
            Some(category) => {
                category.name = data.name;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let state = self.state();
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Ok(false);
        }
        let orphans: Vec<i32> = state.candidates.iter().filter(|c| c.category_id == id).map(|c| c.id).collect();
        state.candidates.retain(|c| c.category_id != id);
        state.ballots.retain(|b| !orphans.contains(&b.candidate_id));
        Ok(true)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Category>, Error> {
        Ok(self.state().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn all(&mut self) -> Result<Vec<Category>, Error> {
        Ok(self.state().categories.clone())
    }
}

impl CandidateCommon for MemoryStore {
    async fn insert(&mut self, data: CandidateInsert) -> Result<i32, Error> {
        let state = self.state();
        if !state.categories.iter().any(|c| c.id == data.category_id) {
            return Err(Error::ServerError("foreign key violation on candidates.category_id".into()));
        }
        let id = state.next_id();
        state.candidates.push(Candidate {
            id,
            name: data.name,
            category_id: data.category_id,
        });
        Ok(id)
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        let state = self.state();
        let before = state.candidates.len();
        state.candidates.retain(|c| c.id != id);
        state.ballots.retain(|b| b.candidate_id != id);
        Ok(state.candidates.len() != before)
    }

    async fn query(&mut self, query: &CandidateQuery) -> Result<Vec<Candidate>, Error> {
        Ok(self
            .state()
            .candidates
            .iter()
            .filter(|c| query.category_id_eq.map_or(true, |id| c.category_id == id))
            .cloned()
            .collect())
    }
}

impl BallotCommon for MemoryStore {
    async fn bulk_insert(&mut self, ballots: Vec<BallotInsert>) -> Result<(), Error> {
        let state = self.state();
        for b in ballots {
            let id = state.next_id();
            state.ballots.push(Ballot {
                id,
                voting_code_id: b.voting_code_id,
                candidate_id: b.candidate_id,
                cast_at: b.cast_at,
            });
        }
        Ok(())
    }

    async fn exists_for_code(&mut self, voting_code_id: i32) -> Result<bool, Error> {
        Ok(self.state().ballots.iter().any(|b| b.voting_code_id == voting_code_id))
    }

    async fn count(&mut self, query: &BallotQuery) -> Result<i64, Error> {
        Ok(self
            .state()
            .ballots
            .iter()
            .filter(|b| query.voting_code_id_eq.map_or(true, |id| b.voting_code_id == id))
            .filter(|b| query.candidate_id_eq.map_or(true, |id| b.candidate_id == id))
            .count() as i64)
    }

    async fn count_by_candidate(&mut self) -> Result<Vec<CandidateCount>, Error> {
        let mut counts: Vec<CandidateCount> = Vec::new();
        for b in &self.state().ballots {
            match counts.iter_mut().find(|c| c.candidate_id == b.candidate_id) {
                Some(c) => c.votes += 1,
                None => counts.push(CandidateCount {
                    candidate_id: b.candidate_id,
                    votes: 1,
                }),
            }
        }
        Ok(counts)
    }
}

impl UserCommon for MemoryStore {
    async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, Error> {
        Ok(self.state().users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let state = self.state();
        let id = state.next_id();
        state.users.push(User {
            id,
            username: user.username,
            password: user.password,
            salt: user.salt,
        });
        Ok(id)
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(staged) = self.staged.take() {
            *self.guard = staged;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

impl Manager for MemoryManager {
    type Store = MemoryStore;
    type TxStore = MemoryStore;

    async fn db(&self) -> Result<Self::Store, Error> {
        Ok(MemoryStore {
            guard: self.state.clone().lock_owned().await,
            staged: None,
        })
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let guard = self.state.clone().lock_owned().await;
        let staged = Some((*guard).clone());
        Ok(MemoryStore { guard, staged })
    }
}
