use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;

use crate::context::Principal;
use crate::core::models::{
    candidate::{Candidate, Insert as CandidateInsert},
    category::{Category, CategoryWithCandidates, Insert as CategoryInsert, Update as CategoryUpdate},
};
use crate::core::ports::repository::Manager;
use crate::core::services::catalog;
use crate::error::Error;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NewCandidate {
    name: String,
}

pub async fn list<M>(_: Principal, manager: Data<M>) -> Result<Json<Vec<CategoryWithCandidates>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(catalog::list(&mut db).await?))
}

pub async fn create<M>(_: Principal, Json(body): Json<CategoryInsert>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let category = catalog::create_category(&mut db, body).await?;
    Ok(HttpResponse::Created().json(category))
}

pub async fn update<M>(_: Principal, id: Path<(i32,)>, Json(body): Json<CategoryUpdate>, manager: Data<M>) -> Result<Json<Category>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(catalog::rename_category(&mut db, id.into_inner().0, body).await?))
}

pub async fn delete<M>(_: Principal, id: Path<(i32,)>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    catalog::delete_category(&mut db, id.into_inner().0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn candidates<M>(_: Principal, id: Path<(i32,)>, manager: Data<M>) -> Result<Json<Vec<Candidate>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(catalog::candidates(&mut db, id.into_inner().0).await?))
}

pub async fn add_candidate<M>(_: Principal, id: Path<(i32,)>, Json(NewCandidate { name }): Json<NewCandidate>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let candidate = catalog::create_candidate(
        &mut db,
        CandidateInsert {
            name,
            category_id: id.into_inner().0,
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(candidate))
}

pub async fn delete_candidate<M>(_: Principal, id: Path<(i32,)>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    catalog::delete_candidate(&mut db, id.into_inner().0).await?;
    Ok(HttpResponse::NoContent().finish())
}
