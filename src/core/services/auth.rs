use chrono::{DateTime, Duration, Utc};
use hex::ToHex;
use log::{info, warn};
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

use crate::core::models::user::{Claim, Insert as UserInsert};
use crate::core::ports::repository::{Store, TxStore, UserCommon};
use crate::core::tokener::Tokener;
use crate::error::Error;

const SALT_CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    let mut rng = thread_rng();
    (0..32).map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char).collect()
}

pub fn issue_token<K>(tokener: &K, user_id: i32, ttl: Duration, now: DateTime<Utc>) -> Result<String, Error>
where
    K: Tokener<Claim>,
{
    tokener.gen_token(&Claim {
        sub: user_id.to_string(),
        exp: (now + ttl).timestamp(),
    })
}

pub async fn login<S, K>(db: &mut S, tokener: &K, username: &str, password: &str, ttl: Duration, now: DateTime<Utc>) -> Result<String, Error>
where
    S: Store,
    K: Tokener<Claim>,
{
    let user = match UserCommon::get_by_username(db, username).await? {
        Some(user) if hash_password(password, &user.salt) == user.password => user,
        _ => {
            warn!("failed login for {:?}", username);
            return Err(Error::InvalidCredentials);
        }
    };
    info!("admin {} logged in", user.username);
    issue_token(tokener, user.id, ttl, now)
}

/// Creates the admin account unless one with that name exists. Returns whether it was created.
pub async fn ensure_admin<T>(mut store: T, username: &str, password: &str) -> Result<bool, Error>
where
    T: TxStore,
{
    if username.is_empty() || password.is_empty() {
        return Err(Error::ConfigError("admin username and password must not be empty".into()));
    }
    if UserCommon::get_by_username(&mut store, username).await?.is_some() {
        store.rollback().await?;
        return Ok(false);
    }
    let salt = random_salt();
    UserCommon::insert(
        &mut store,
        UserInsert {
            username: username.to_owned(),
            password: hash_password(password, &salt),
            salt,
        },
    )
    .await?;
    store.commit().await?;
    info!("admin account {} created", username);
    Ok(true)
}
