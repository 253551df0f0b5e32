use actix_web::web::{Data, Json};
use actix_web::HttpResponse;

use crate::context::Principal;
use crate::core::exporter::Exporter;
use crate::core::models::tally::{Standing, Tally};
use crate::core::ports::repository::Manager;
use crate::core::services::tally;
use crate::error::Error;

pub async fn results<M>(manager: Data<M>) -> Result<Json<Tally>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(tally::tally(&mut db).await?))
}

pub async fn export<M, X>(manager: Data<M>, exporter: Data<X>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
    X: Exporter + 'static,
{
    let mut db = manager.db().await?;
    let counts = tally::tally(&mut db).await?;
    let body = exporter.results(&counts)?;
    Ok(super::attachment::<X>("voting_results", body))
}

pub async fn standings<M>(_: Principal, manager: Data<M>) -> Result<Json<Vec<Standing>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    Ok(Json(tally::standings(&mut db).await?))
}

#[cfg(test)]
mod test {
    use crate::database::memory::MemoryManager;
    use crate::handlers::test_support::app;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;

    #[actix_web::test]
    async fn test_results_exports_are_public() {
        let app = test::init_service(app(MemoryManager::default())).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/results/export/xlsx").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"voting_results.xlsx\""
        );
        let body = test::read_body(resp).await;
        assert_eq!(&body[..2], b"PK");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/admin/standings").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }
}
