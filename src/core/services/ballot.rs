use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashMap;

use crate::core::models::{ballot::Insert as BallotInsert, candidate::Query as CandidateQuery};
use crate::core::ports::repository::{BallotCommon, CandidateCommon, CategoryCommon, CodeCommon, TxStore};
use crate::error::Error;

/// Records one ballot per category for the code and consumes the code.
///
/// Runs entirely inside `store`'s transaction: the code row is locked first, so of
/// several concurrent submissions with one code exactly one commits and the rest see
/// `AlreadyVoted`. Any failure rolls back, leaving neither ballots nor a used flag.
/// `selections` maps category id to candidate id; entries for unknown categories are ignored.
pub async fn submit<T>(mut store: T, code_id: i32, selections: &HashMap<i32, i32>, now: DateTime<Utc>) -> Result<usize, Error>
where
    T: TxStore,
{
    match cast(&mut store, code_id, selections, now).await {
        Ok(n) => {
            store.commit().await?;
            info!("code {} cast {} ballots", code_id, n);
            Ok(n)
        }
        Err(e) => {
            store.rollback().await?;
            warn!("ballot for code {} rejected: {}", code_id, e);
            Err(e)
        }
    }
}

async fn cast<T>(store: &mut T, code_id: i32, selections: &HashMap<i32, i32>, now: DateTime<Utc>) -> Result<usize, Error>
where
    T: TxStore,
{
    let code = CodeCommon::get_for_update(store, code_id).await?.ok_or(Error::CodeNotFound)?;
    if code.used || BallotCommon::exists_for_code(store, code.id).await? {
        return Err(Error::AlreadyVoted);
    }
    if now >= code.expires_at {
        return Err(Error::CodeExpired);
    }
    let categories = CategoryCommon::all(store).await?;
    if categories.is_empty() {
        return Err(Error::EmptyCatalog);
    }
    let owners: HashMap<i32, i32> = CandidateCommon::query(store, &CandidateQuery::default())
        .await?
        .into_iter()
        .map(|c| (c.id, c.category_id))
        .collect();
    let ballots: Vec<BallotInsert> = categories
        .iter()
        .filter_map(|category| {
            let candidate_id = *selections.get(&category.id)?;
            (owners.get(&candidate_id) == Some(&category.id)).then_some(BallotInsert {
                voting_code_id: code.id,
                candidate_id,
                cast_at: now,
            })
        })
        .collect();
    if ballots.len() != categories.len() {
        return Err(Error::IncompleteBallot {
            expected: categories.len(),
            valid: ballots.len(),
        });
    }
    let n = ballots.len();
    BallotCommon::bulk_insert(store, ballots).await?;
    CodeCommon::mark_used(store, code.id).await?;
    Ok(n)
}
