mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
mod request;
mod response;

use crate::config::Config;
use crate::core::ports::repository::Manager;
use crate::core::services::auth::ensure_admin;
use crate::database::sqlx::PgSqlxManager;
use crate::impls::exporters::{pdf::PdfExporter, xlsx::XlsxExporter};
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::session::Session;
use actix_web::web::{delete, get, post, put, scope, Data, ServiceConfig};
use actix_web::HttpServer;
use env_logger::Env;
use log::info;
use sqlx::postgres::PgPoolOptions;

pub fn routes<M>(cfg: &mut ServiceConfig)
where
    M: Manager + 'static,
{
    cfg.route("/login", post().to(handlers::login::<M>))
        .route("/logout", post().to(handlers::logout))
        .service(
            scope("/codes")
                .route("/validate", post().to(handlers::code::enter::<M>))
                .route("/{code_id}/ballot", post().to(handlers::ballot::submit::<M>)),
        )
        .service(
            scope("/results")
                .route("", get().to(handlers::result::results::<M>))
                .route("/export/xlsx", get().to(handlers::result::export::<M, XlsxExporter>))
                .route("/export/pdf", get().to(handlers::result::export::<M, PdfExporter>)),
        )
        .service(
            scope("/admin")
                .service(
                    scope("/codes")
                        .route("", post().to(handlers::code::generate::<M>))
                        .route("", get().to(handlers::code::list::<M>))
                        .route("/export/xlsx", get().to(handlers::code::export::<M, XlsxExporter>))
                        .route("/export/pdf", get().to(handlers::code::export::<M, PdfExporter>)),
                )
                .service(
                    scope("/categories")
                        .route("", get().to(handlers::category::list::<M>))
                        .route("", post().to(handlers::category::create::<M>))
                        .service(
                            scope("/{category_id}")
                                .route("", put().to(handlers::category::update::<M>))
                                .route("", delete().to(handlers::category::delete::<M>))
                                .route("/candidates", get().to(handlers::category::candidates::<M>))
                                .route("/candidates", post().to(handlers::category::add_candidate::<M>)),
                        ),
                )
                .route("/candidates/{candidate_id}", delete().to(handlers::category::delete_candidate::<M>))
                .route("/standings", get().to(handlers::result::standings::<M>)),
        );
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = Config::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await.map_err(error::Error::from)?;
    let manager = PgSqlxManager::new(pool);
    if let Some((username, password)) = &config.admin {
        ensure_admin(manager.tx().await?, username, password).await?;
    }
    let jwt = JWT::new(config.jwt_secret.as_bytes().to_vec());
    let bind = (config.bind_addr.clone(), config.port);
    info!(
        "listening on {}:{} (pool {}, session {} min, {}-char codes)",
        bind.0,
        bind.1,
        config.max_connections,
        config.session_ttl.num_minutes(),
        config.code_policy.length
    );
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(Session::new(jwt.clone(), config.session_ttl))
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(manager.clone()))
            .app_data(Data::new(jwt.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(XlsxExporter))
            .app_data(Data::new(PdfExporter))
            .configure(routes::<PgSqlxManager>)
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
