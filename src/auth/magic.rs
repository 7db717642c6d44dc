// src/auth/magic.rs
use rusqlite::Connection;

use crate::auth::token::{generate_token_default, hash_token};
use crate::db::auth as db_auth;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct MagicLinkConfig {
    /// TTL for magic links in seconds.
    pub ttl_secs: i64,
    /// Path the link points at, e.g. "/auth/magic".
    pub magic_path: String,
}

impl Default for MagicLinkConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            magic_path: "/auth/magic".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedMagicLink {
    pub email: String,
    pub user_id: i64,
    /// Raw token (never stored).
    pub token: String,
    pub expires_at: i64,
    /// Relative URL like "/auth/magic?token=..."
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct RedeemedMagicLink {
    pub user_id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct MagicLinkService {
    cfg: MagicLinkConfig,
}

impl MagicLinkService {
    pub fn new(cfg: MagicLinkConfig) -> Self {
        Self { cfg }
    }

    /// Trim + lowercase, minimal sanity check.
    pub fn normalize_email(email: &str) -> Result<String, ServerError> {
        let e = email.trim().to_lowercase();
        if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
            return Err(ServerError::BadRequest("invalid email".into()));
        }
        Ok(e)
    }

    fn build_link(&self, token: &str) -> String {
        format!("{}?token={}", self.cfg.magic_path, token)
    }

    /// Signup and login in one step: creates the user on first request and
    /// stores the hash of a fresh single-use token.
    pub fn request_link(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<IssuedMagicLink, ServerError> {
        let email = Self::normalize_email(email)?;
        let user_id = db_auth::get_or_create_user(conn, &email, now)?;

        let token = generate_token_default();
        let expires_at = now + self.cfg.ttl_secs;
        db_auth::insert_magic_link(conn, user_id, &hash_token(&token), now, expires_at)?;

        Ok(IssuedMagicLink {
            email,
            user_id,
            link: self.build_link(&token),
            token,
            expires_at,
        })
    }

    /// Consumes the link and records the login.
    pub fn redeem(
        &self,
        conn: &mut Connection,
        token: &str,
        now: i64,
    ) -> Result<RedeemedMagicLink, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }

        let Some(user_id) = db_auth::consume_magic_link(conn, &hash_token(token), now)? else {
            return Err(ServerError::Unauthorized("invalid or expired link".into()));
        };

        db_auth::record_login(conn, user_id, now)?;
        let email = db_auth::user_email(conn, user_id)?.ok_or(ServerError::NotFound)?;

        Ok(RedeemedMagicLink { user_id, email })
    }
}
