use actix_web::web::{Data, Json, Query};
use actix_web::HttpResponse;
use chrono::Utc;
use rand::thread_rng;

use crate::config::Config;
use crate::context::Principal;
use crate::core::exporter::Exporter;
use crate::core::models::{
    category::BallotForm,
    code::{Generate, Query as CodeQuery, VotingCode},
};
use crate::core::ports::repository::Manager;
use crate::core::services::code;
use crate::error::Error;
use crate::request::{CodeFilter, EnterCode, Pagination};
use crate::response::{List, Message};

/// Entry point for voters: a usable code yields the ballot form.
pub async fn enter<M>(Json(EnterCode { code: submitted }): Json<EnterCode>, manager: Data<M>) -> Result<Json<BallotForm>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let form = code::ballot_form(&mut db, submitted.trim(), Utc::now()).await?;
    Ok(Json(form))
}

pub async fn generate<M>(_: Principal, Json(req): Json<Generate>, manager: Data<M>, config: Data<Config>) -> Result<Json<Message<Vec<VotingCode>>>, Error>
where
    M: Manager + 'static,
{
    let tx = manager.tx().await?;
    let mut rng = thread_rng();
    let codes = code::generate(tx, req, config.code_policy, Utc::now(), &mut rng).await?;
    Ok(Json(Message::new(format!("{} codes generated successfully.", codes.len()), Some(codes))))
}

pub async fn list<M>(_: Principal, Query(filter): Query<CodeFilter>, Query(page): Query<Pagination>, manager: Data<M>) -> Result<Json<List<VotingCode>>, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let query = CodeQuery {
        used_eq: filter.used,
        code_like: filter.search.filter(|s| !s.is_empty()),
    };
    let (codes, total) = code::list(&mut db, query, page.into()).await?;
    Ok(Json(List::new(codes, total)))
}

pub async fn export<M, X>(_: Principal, manager: Data<M>, exporter: Data<X>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
    X: Exporter + 'static,
{
    let mut db = manager.db().await?;
    let codes = code::all(&mut db).await?;
    let body = exporter.codes(&codes)?;
    Ok(super::attachment::<X>("generated_codes", body))
}

#[cfg(test)]
mod test {
    use crate::core::models::code::Insert as CodeInsert;
    use crate::core::ports::repository::{CodeCommon, Manager};
    use crate::core::services::auth::issue_token;
    use crate::database::memory::MemoryManager;
    use crate::handlers::test_support::{app, jwt};
    use crate::middlewares::session::JWT_TOKEN;
    use actix_web::cookie::Cookie;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};

    fn admin_cookie() -> Cookie<'static> {
        Cookie::new(JWT_TOKEN, issue_token(&jwt(), 1, Duration::minutes(5), Utc::now()).unwrap())
    }

    #[actix_web::test]
    async fn test_enter_code_errors() {
        let manager = MemoryManager::default();
        {
            let mut db = manager.db().await.unwrap();
            let used = CodeCommon::insert(&mut db, CodeInsert { code: "USED1".into(), expires_at: Utc::now() + Duration::hours(1) })
                .await
                .unwrap()
                .unwrap();
            CodeCommon::mark_used(&mut db, used.id).await.unwrap();
            CodeCommon::insert(&mut db, CodeInsert { code: "OLD01".into(), expires_at: Utc::now() - Duration::hours(1) })
                .await
                .unwrap();
        }
        let app = test::init_service(app(manager)).await;
        for (code, status, kind) in [
            ("NOPE1", StatusCode::NOT_FOUND, "NotFound"),
            ("USED1", StatusCode::CONFLICT, "AlreadyUsed"),
            ("OLD01", StatusCode::GONE, "Expired"),
        ] {
            let req = test::TestRequest::post().uri("/codes/validate").set_json(json!({ "code": code })).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status, "{}", code);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], kind);
        }
    }

    #[actix_web::test]
    async fn test_generate_requires_admin() {
        let app = test::init_service(app(MemoryManager::default())).await;
        let req = test::TestRequest::post()
            .uri("/admin/codes")
            .set_json(json!({"count": 5, "expiry_hours": 24}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[actix_web::test]
    async fn test_generate_list_and_export() {
        let app = test::init_service(app(MemoryManager::default())).await;
        let req = test::TestRequest::post()
            .uri("/admin/codes")
            .cookie(admin_cookie())
            .set_json(json!({"count": 5, "expiry_hours": 24}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "5 codes generated successfully.");
        assert_eq!(body["data"].as_array().unwrap().len(), 5);

        let req = test::TestRequest::get().uri("/admin/codes?used=false&page=1&size=2").cookie(admin_cookie()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 5);
        assert_eq!(body["list"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get().uri("/admin/codes/export/pdf").cookie(admin_cookie()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"generated_codes.pdf\""
        );
    }
}
