use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http::header, Error, HttpMessage};
use chrono::{Duration, Utc};
use std::future::Future;
use std::pin::Pin;

use crate::context::Principal;
use crate::core::models::user::Claim;
use crate::core::services::auth::issue_token;
use crate::core::tokener::{Payload, Tokener};
use crate::impls::tokener::jwt::JWT;

pub static JWT_TOKEN: &str = "JWT_TOKEN";

pub fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build(JWT_TOKEN, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .finish()
}

fn bearer(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(JWT_TOKEN) {
        return Some(cookie.value().to_owned());
    }
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_owned)
}

/// Resolves the optional admin principal from the session token and slides the
/// session expiry forward on every authenticated request.
pub struct Session {
    tokener: JWT,
    ttl: Duration,
}

impl Session {
    pub fn new(tokener: JWT, ttl: Duration) -> Self {
        Self { tokener, ttl }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Session
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Response = ServiceResponse<B>;
    type Transform = SessionService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let tokener = self.tokener.clone();
        let ttl = self.ttl;
        Box::pin(async move {
            Ok(SessionService {
                tokener,
                ttl,
                next_service: service,
            })
        })
    }
}

pub struct SessionService<S> {
    tokener: JWT,
    ttl: Duration,
    next_service: S,
}

impl<S, B> Service<ServiceRequest> for SessionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let principal = bearer(&req)
            .and_then(|token| <JWT as Tokener<Claim>>::verify_token(&self.tokener, &token).ok())
            .and_then(|claim| claim.user().parse::<i32>().ok())
            .map(|id| Principal { id });
        if let Some(p) = principal {
            req.extensions_mut().insert(p);
        }

        let tokener = self.tokener.clone();
        let ttl = self.ttl;
        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let mut resp = res_fut.await?;
            let Some(p) = principal else {
                return Ok(resp);
            };
            // login and logout set the cookie themselves
            if resp.response().cookies().any(|c| c.name() == JWT_TOKEN) {
                return Ok(resp);
            }
            match issue_token(&tokener, p.id, ttl, Utc::now()) {
                Ok(token) => {
                    if let Err(e) = resp.response_mut().add_cookie(&session_cookie(token, ttl)) {
                        log::warn!("failed to refresh session cookie: {}", e);
                    }
                }
                Err(e) => log::warn!("failed to refresh session token: {}", e),
            }
            Ok(resp)
        })
    }
}
