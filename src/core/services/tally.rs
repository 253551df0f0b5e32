use std::collections::HashMap;

use crate::core::models::tally::{CandidateTally, CategoryTally, Standing, Tally};
use crate::core::ports::repository::{BallotCommon, Store};
use crate::core::services::catalog;
use crate::error::Error;

pub async fn tally<S>(db: &mut S) -> Result<Tally, Error>
where
    S: Store,
{
    let catalog = catalog::list(db).await?;
    let counts: HashMap<i32, i64> = BallotCommon::count_by_candidate(db)
        .await?
        .into_iter()
        .map(|c| (c.candidate_id, c.votes))
        .collect();
    Ok(Tally {
        categories: catalog
            .into_iter()
            .map(|category| CategoryTally {
                id: category.id,
                name: category.name,
                candidates: category
                    .candidates
                    .into_iter()
                    .map(|c| CandidateTally {
                        votes: counts.get(&c.id).copied().unwrap_or(0),
                        id: c.id,
                        name: c.name,
                    })
                    .collect(),
            })
            .collect(),
    })
}

/// Every candidate, most votes first. Ties keep catalog order.
pub async fn standings<S>(db: &mut S) -> Result<Vec<Standing>, Error>
where
    S: Store,
{
    let mut standings: Vec<Standing> = tally(db)
        .await?
        .categories
        .into_iter()
        .flat_map(|category| {
            category.candidates.into_iter().map(move |c| Standing {
                category: category.name.clone(),
                candidate: c.name,
                votes: c.votes,
            })
        })
        .collect();
    standings.sort_by(|a, b| b.votes.cmp(&a.votes));
    Ok(standings)
}
