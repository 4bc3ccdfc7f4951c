//! Authentication service: password hashing, scoped JWTs and the
//! signup/login/refresh/verification flows.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info, warn};

use crate::config::Config;
use crate::constants::*;
use crate::errors::ApiError;
use crate::models::{Claims, CurrentUser, TokenResponse, TokenScope, User};
use crate::repositories::UserRepository;
use crate::services::token_blacklist::TokenBlacklist;
use crate::services::user_cache::UserCache;
use crate::utils::{gravatar_url, mask_email};

/// Hash a password using bcrypt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    Ok(verify(password, hash)?)
}

/// Signing keys and lifetimes for every token scope.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    email_ttl_secs: i64,
}

impl JwtKeys {
    pub fn from_config(config: &Config) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret_key.as_bytes()),
            algorithm: config.algorithm,
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
            email_ttl_secs: config.email_token_ttl_secs,
        }
    }

    fn create_token(&self, email: &str, scope: TokenScope, ttl_secs: i64) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_string(),
            scope,
            exp: now + ttl_secs,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        debug!("Generated {} for {}", scope, mask_email(email));
        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding)?)
    }

    pub fn create_access_token(&self, email: &str) -> Result<String, ApiError> {
        self.create_token(email, TokenScope::AccessToken, self.access_ttl_secs)
    }

    pub fn create_refresh_token(&self, email: &str) -> Result<String, ApiError> {
        self.create_token(email, TokenScope::RefreshToken, self.refresh_ttl_secs)
    }

    pub fn create_email_token(&self, email: &str) -> Result<String, ApiError> {
        self.create_token(email, TokenScope::EmailToken, self.email_ttl_secs)
    }

    /// Decode and verify signature and expiry, without checking the scope.
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(self.algorithm);
        decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }

    /// Claims of a valid access token.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.decode(token).map_err(|e| {
            debug!("Access token rejected: {}", e);
            could_not_validate()
        })?;
        if !claims.has_scope(TokenScope::AccessToken) {
            return Err(could_not_validate());
        }
        Ok(claims)
    }

    /// Email carried by a valid refresh token.
    pub fn decode_refresh_token(&self, token: &str) -> Result<String, ApiError> {
        let claims = self.decode(token).map_err(|_| could_not_validate())?;
        if !claims.has_scope(TokenScope::RefreshToken) {
            return Err(ApiError::unauthorized(CODE_INVALID_SCOPE, ERR_INVALID_SCOPE));
        }
        Ok(claims.sub)
    }

    /// Email carried by a valid email verification token.
    pub fn decode_email_token(&self, token: &str) -> Result<String, ApiError> {
        let claims = self.decode(token).map_err(|_| {
            ApiError::unprocessable(CODE_INVALID_EMAIL_TOKEN, ERR_INVALID_EMAIL_TOKEN)
        })?;
        if !claims.has_scope(TokenScope::EmailToken) {
            return Err(ApiError::unauthorized(CODE_INVALID_SCOPE, ERR_INVALID_SCOPE));
        }
        Ok(claims.sub)
    }
}

fn could_not_validate() -> ApiError {
    ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_COULD_NOT_VALIDATE)
}

/// Result of asking for another confirmation email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailRequestOutcome {
    AlreadyConfirmed,
    /// The account exists and still needs confirming
    SendVerification,
    /// No such account; answered like `SendVerification` so accounts cannot be probed
    UnknownAccount,
}

impl EmailRequestOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            EmailRequestOutcome::AlreadyConfirmed => MSG_EMAIL_ALREADY_CONFIRMED,
            EmailRequestOutcome::SendVerification | EmailRequestOutcome::UnknownAccount => {
                MSG_CHECK_EMAIL
            }
        }
    }

    pub fn should_send(&self) -> bool {
        matches!(self, EmailRequestOutcome::SendVerification)
    }
}

/// Service for authentication operations.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn UserCache>,
    blacklist: TokenBlacklist,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn UserCache>,
        blacklist: TokenBlacklist,
        keys: JwtKeys,
    ) -> Self {
        Self {
            users,
            cache,
            blacklist,
            keys,
        }
    }

    #[cfg(test)]
    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Register a new, unconfirmed account with a Gravatar avatar.
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, ApiError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ApiError::conflict(CODE_ACCOUNT_EXISTS, ERR_ACCOUNT_EXISTS));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(email, &password_hash, Some(gravatar_url(email)))
            .await?;

        info!("User registered: {}", mask_email(&user.email));
        Ok(user)
    }

    /// Check credentials and issue a fresh token pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let user = self
            .users
            .find_by_email(username)
            .await?
            .ok_or_else(|| ApiError::unauthorized(CODE_INVALID_CREDENTIALS, ERR_INVALID_EMAIL))?;

        if !user.confirmed {
            return Err(ApiError::unauthorized(
                CODE_EMAIL_NOT_CONFIRMED,
                ERR_EMAIL_NOT_CONFIRMED,
            ));
        }

        if !verify_password(password, &user.password_hash)? {
            warn!("Failed login attempt for {}", mask_email(&user.email));
            return Err(ApiError::unauthorized(
                CODE_INVALID_CREDENTIALS,
                ERR_INVALID_PASSWORD,
            ));
        }

        let tokens = self.issue_tokens(&user).await?;
        info!("User logged in: {}", mask_email(&user.email));
        Ok(tokens)
    }

    /// Rotate the token pair. A refresh token that is not the one currently
    /// stored revokes the stored one as well.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        let email = self.keys.decode_refresh_token(refresh_token)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(could_not_validate)?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            warn!(
                "Refresh token reuse detected for {}, revoking session",
                mask_email(&user.email)
            );
            if let Some(id) = user.id {
                self.users.update_token(id, None).await?;
            }
            return Err(ApiError::unauthorized(
                CODE_INVALID_TOKEN,
                ERR_INVALID_REFRESH_TOKEN,
            ));
        }

        self.issue_tokens(&user).await
    }

    async fn issue_tokens(&self, user: &User) -> Result<TokenResponse, ApiError> {
        let id = user
            .id
            .ok_or_else(|| ApiError::internal(CODE_INTERNAL_ERROR, ERR_FAILED_FETCH_USER))?;

        let access_token = self.keys.create_access_token(&user.email)?;
        let refresh_token = self.keys.create_refresh_token(&user.email)?;
        self.users.update_token(id, Some(&refresh_token)).await?;

        Ok(TokenResponse::bearer(access_token, refresh_token))
    }

    /// Confirm the email named by a verification token.
    pub async fn confirm_email(&self, token: &str) -> Result<&'static str, ApiError> {
        let email = self.keys.decode_email_token(token)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::bad_request(CODE_VERIFICATION_FAILED, ERR_VERIFICATION))?;

        if user.confirmed {
            return Ok(MSG_EMAIL_ALREADY_CONFIRMED);
        }

        self.users.confirm_email(&user.email).await?;
        self.cache.invalidate(&user.email).await;
        info!("Email confirmed: {}", mask_email(&user.email));
        Ok(MSG_EMAIL_CONFIRMED)
    }

    pub async fn request_email(&self, email: &str) -> Result<EmailRequestOutcome, ApiError> {
        Ok(match self.users.find_by_email(email).await? {
            Some(user) if user.confirmed => EmailRequestOutcome::AlreadyConfirmed,
            Some(_) => EmailRequestOutcome::SendVerification,
            None => {
                debug!("Confirmation requested for unknown {}", mask_email(email));
                EmailRequestOutcome::UnknownAccount
            }
        })
    }

    /// Resolve the user behind an access token.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, ApiError> {
        if self.blacklist.is_revoked(token) {
            debug!("Rejected revoked access token");
            return Err(could_not_validate());
        }

        let claims = self.keys.decode_access_token(token)?;

        let user = match self.cache.get(&claims.sub).await {
            Some(user) => user,
            None => {
                let user = self
                    .users
                    .find_by_email(&claims.sub)
                    .await?
                    .ok_or_else(could_not_validate)?;
                self.cache.set(&user).await;
                user
            }
        };

        Ok(CurrentUser {
            user,
            token: token.to_string(),
            token_exp: claims.exp,
        })
    }

    /// Revoke the presented access token and drop the stored refresh token.
    pub async fn logout(&self, current: &CurrentUser) -> Result<(), ApiError> {
        self.blacklist.revoke(&current.token, current.token_exp).await;
        if let Some(id) = current.user.id {
            self.users.update_token(id, None).await?;
        }
        self.cache.invalidate(&current.user.email).await;
        info!("User logged out: {}", mask_email(&current.user.email));
        Ok(())
    }
}
