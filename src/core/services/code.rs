use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use rand::Rng;

use crate::core::models::{
    category::BallotForm,
    code::{Generate, Insert as CodeInsert, Policy, Query as CodeQuery, VotingCode, MAX_LENGTH},
    common::Pagination,
};
use crate::core::ports::repository::{CodeCommon, Store, TxStore};
use crate::core::services::catalog;
use crate::error::Error;

// no 0/O, 1/I
const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const MAX_BATCH: u32 = 10_000;
pub const MAX_EXPIRY_HOURS: u32 = 24 * 366;

pub fn random_code<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length).map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char).collect()
}

/// Looks a submitted code up and checks that it can still be used. Read only.
pub async fn validate<S>(db: &mut S, code: &str, now: DateTime<Utc>) -> Result<VotingCode, Error>
where
    S: Store,
{
    let voting_code = CodeCommon::get_by_code(db, code).await?.ok_or(Error::CodeNotFound)?;
    voting_code.check(now)?;
    Ok(voting_code)
}

pub async fn ballot_form<S>(db: &mut S, code: &str, now: DateTime<Utc>) -> Result<BallotForm, Error>
where
    S: Store,
{
    let voting_code = validate(db, code, now).await?;
    let categories = catalog::list(db).await?;
    Ok(BallotForm {
        code_id: voting_code.id,
        categories,
    })
}

pub async fn generate<T, R>(mut store: T, req: Generate, policy: Policy, now: DateTime<Utc>, rng: &mut R) -> Result<Vec<VotingCode>, Error>
where
    T: TxStore,
    R: Rng,
{
    if req.count == 0 || req.count > MAX_BATCH {
        return Err(Error::BusinessError(format!("count must be between 1 and {}", MAX_BATCH)));
    }
    if req.expiry_hours == 0 || req.expiry_hours > MAX_EXPIRY_HOURS {
        return Err(Error::BusinessError(format!("expiry hours must be between 1 and {}", MAX_EXPIRY_HOURS)));
    }
    if policy.length == 0 || policy.length > MAX_LENGTH {
        return Err(Error::ConfigError(format!("code length must be between 1 and {}", MAX_LENGTH)));
    }
    let expires_at = now + Duration::hours(i64::from(req.expiry_hours));
    match issue(&mut store, req.count, expires_at, policy, rng).await {
        Ok(codes) => {
            store.commit().await?;
            info!("generated {} voting codes expiring at {}", codes.len(), expires_at);
            Ok(codes)
        }
        Err(e) => {
            store.rollback().await?;
            warn!("code generation aborted: {}", e);
            Err(e)
        }
    }
}

async fn issue<T, R>(store: &mut T, count: u32, expires_at: DateTime<Utc>, policy: Policy, rng: &mut R) -> Result<Vec<VotingCode>, Error>
where
    T: TxStore,
    R: Rng,
{
    let mut codes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        codes.push(issue_one(store, expires_at, policy, rng).await?);
    }
    Ok(codes)
}

async fn issue_one<T, R>(store: &mut T, expires_at: DateTime<Utc>, policy: Policy, rng: &mut R) -> Result<VotingCode, Error>
where
    T: TxStore,
    R: Rng,
{
    for _ in 0..policy.max_attempts {
        let code = random_code(rng, policy.length);
        if let Some(inserted) = CodeCommon::insert(store, CodeInsert { code, expires_at }).await? {
            return Ok(inserted);
        }
    }
    Err(Error::CodeSpaceExhausted(policy.max_attempts))
}

pub async fn list<S>(db: &mut S, query: CodeQuery, pagination: Pagination) -> Result<(Vec<VotingCode>, i64), Error>
where
    S: Store,
{
    let total = CodeCommon::count(db, &query).await?;
    let codes = CodeCommon::query(db, &query, Some(pagination)).await?;
    Ok((codes, total))
}

pub async fn all<S>(db: &mut S) -> Result<Vec<VotingCode>, Error>
where
    S: Store,
{
    CodeCommon::query(db, &CodeQuery::default(), None).await
}
