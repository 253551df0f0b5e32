use itertools::Itertools;
use log::info;

use crate::core::models::{
    candidate::{Candidate, Insert as CandidateInsert, Query as CandidateQuery},
    category::{Category, CategoryWithCandidates, Insert as CategoryInsert, Update as CategoryUpdate},
};
use crate::core::ports::repository::{CandidateCommon, CategoryCommon, Store};
use crate::error::Error;

pub const MAX_NAME_LEN: usize = 100;

fn clean_name(name: &str) -> Result<String, Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::BusinessError("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::BusinessError(format!("name must be at most {} characters", MAX_NAME_LEN)));
    }
    Ok(name.to_owned())
}

/// Every category with its candidates, both in id order. Two queries regardless of catalog size.
pub async fn list<S>(db: &mut S) -> Result<Vec<CategoryWithCandidates>, Error>
where
    S: Store,
{
    let categories = CategoryCommon::all(db).await?;
    let mut candidates = CandidateCommon::query(db, &CandidateQuery::default())
        .await?
        .into_iter()
        .into_group_map_by(|c| c.category_id);
    Ok(categories
        .into_iter()
        .map(|Category { id, name }| CategoryWithCandidates {
            candidates: candidates.remove(&id).unwrap_or_default(),
            id,
            name,
        })
        .collect())
}

pub async fn create_category<S>(db: &mut S, data: CategoryInsert) -> Result<Category, Error>
where
    S: Store,
{
    let name = clean_name(&data.name)?;
    let id = CategoryCommon::insert(db, CategoryInsert { name: name.clone() }).await?;
    info!("category {} created: {}", id, name);
    Ok(Category { id, name })
}

pub async fn rename_category<S>(db: &mut S, id: i32, data: CategoryUpdate) -> Result<Category, Error>
where
    S: Store,
{
    let name = clean_name(&data.name)?;
    if !CategoryCommon::update(db, id, CategoryUpdate { name: name.clone() }).await? {
        return Err(Error::NotFound("category"));
    }
    Ok(Category { id, name })
}

/// Candidates of the category and their ballots go with it.
pub async fn delete_category<S>(db: &mut S, id: i32) -> Result<(), Error>
where
    S: Store,
{
    if !CategoryCommon::delete(db, id).await? {
        return Err(Error::NotFound("category"));
    }
    info!("category {} deleted", id);
    Ok(())
}

pub async fn candidates<S>(db: &mut S, category_id: i32) -> Result<Vec<Candidate>, Error>
where
    S: Store,
{
    if CategoryCommon::get(db, category_id).await?.is_none() {
        return Err(Error::NotFound("category"));
    }
    CandidateCommon::query(
        db,
        &CandidateQuery {
            category_id_eq: Some(category_id),
        },
    )
    .await
}

pub async fn create_candidate<S>(db: &mut S, data: CandidateInsert) -> Result<Candidate, Error>
where
    S: Store,
{
    let name = clean_name(&data.name)?;
    if CategoryCommon::get(db, data.category_id).await?.is_none() {
        return Err(Error::NotFound("category"));
    }
    let id = CandidateCommon::insert(
        db,
        CandidateInsert {
            name: name.clone(),
            category_id: data.category_id,
        },
    )
    .await?;
    Ok(Candidate {
        id,
        name,
        category_id: data.category_id,
    })
}

pub async fn delete_candidate<S>(db: &mut S, id: i32) -> Result<(), Error>
where
    S: Store,
{
    if !CandidateCommon::delete(db, id).await? {
        return Err(Error::NotFound("candidate"));
    }
    Ok(())
}
