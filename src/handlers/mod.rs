pub mod ballot;
pub mod category;
pub mod code;
pub mod result;

use actix_web::cookie::{time::OffsetDateTime, Cookie};
use actix_web::http::header;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use chrono::Utc;

use crate::config::Config;
use crate::core::exporter::Exporter;
use crate::core::ports::repository::Manager;
use crate::core::services::auth;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::session::{session_cookie, JWT_TOKEN};
use crate::request::Login;
use crate::response::Message;

fn attachment<X: Exporter>(name: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(X::CONTENT_TYPE)
        .insert_header((header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}.{}\"", name, X::EXTENSION)))
        .body(body)
}

pub async fn login<M>(Json(Login { username, password }): Json<Login>, manager: Data<M>, tokener: Data<JWT>, config: Data<Config>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let token = auth::login(&mut db, tokener.get_ref(), &username, &password, config.session_ttl, Utc::now()).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, config.session_ttl))
        .json(Message::<()>::new("logged in", None)))
}

pub async fn logout() -> HttpResponse {
    let mut expired = Cookie::new(JWT_TOKEN, "");
    expired.set_path("/");
    expired.set_expires(OffsetDateTime::UNIX_EPOCH);
    HttpResponse::Ok().cookie(expired).json(Message::<()>::new("logged out", None))
}
