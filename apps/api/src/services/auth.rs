//! Authentication service for Eventhub
//!
//! This module provides:
//! - User registration with Argon2id password hashing
//! - Login with signed JWT issuance
//! - Token verification for request context construction

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm as HashAlgorithm, Argon2, Params, Version,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{ApiError, ApiResult};
use crate::models::{Caller, Claims, NewUser, User, TOKEN_ISSUER};
use crate::repositories::Store;

/// Access tokens are valid for one day
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

const BEARER_PREFIX: &str = "Bearer ";

/// Authentication service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token TTL in seconds
    pub token_ttl_secs: i64,
    /// JWT issuer
    pub issuer: String,
}

impl AuthConfig {
    /// Create a new AuthConfig with the fixed one-day expiry
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: TOKEN_TTL_SECS,
            issuer: TOKEN_ISSUER.to_string(),
        }
    }
}

/// Registration, login, password hashing and token handling
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    argon2: Argon2<'static>,
    /// Verified against when a login email is unknown, so both paths cost
    /// one Argon2 verification.
    dummy_password_hash: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: Arc<dyn Store>, config: AuthConfig) -> ApiResult<Self> {
        // Argon2id v1.3 with the crate defaults: 19 MiB memory, 2 passes,
        // 1 lane. Changing these invalidates nothing (parameters are stored
        // in each PHC hash string) but changes login latency.
        let argon2 = Argon2::new(HashAlgorithm::Argon2id, Version::V0x13, Params::DEFAULT);

        let dummy_salt = SaltString::generate(&mut OsRng);
        let dummy_password_hash = argon2
            .hash_password(b"dummy_password_for_timing_attack_prevention", &dummy_salt)?
            .to_string();

        Ok(Self {
            store,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            config,
            argon2,
            dummy_password_hash,
        })
    }

    /// Register a new user account and sign them in
    ///
    /// # Errors
    /// - `ApiError::ValidationError` if name, email or password is invalid
    /// - `ApiError::Conflict` if the email is already registered
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<(User, String)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("name is required"));
        }

        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::validation("invalid email format"));
        }

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = self.hash_password(password)?;
        let user = self
            .store
            .insert_user(NewUser {
                name: name.to_string(),
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        let token = self.issue_token(&Caller::from(&user))?;
        Ok((user, token))
    }

    /// Authenticate a user by email and password
    ///
    /// # Errors
    /// - `ApiError::InvalidCredentials` for an unknown email or wrong password
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<(User, String)> {
        let user = self.store.find_user_by_email(email.trim()).await?;

        let user = match user {
            Some(user) if self.verify_password(password, &user.password_hash)? => user,
            Some(user) => {
                tracing::warn!(user_id = %user.id, "Login failed: invalid password");
                return Err(ApiError::InvalidCredentials);
            }
            None => {
                // Result ignored; only the timing matters.
                let _ = self.verify_password(password, &self.dummy_password_hash);
                tracing::warn!("Login failed: unknown email");
                return Err(ApiError::InvalidCredentials);
            }
        };

        tracing::info!(user_id = %user.id, "User logged in");

        let token = self.issue_token(&Caller::from(&user))?;
        Ok((user, token))
    }

    /// Issue a signed token for `caller`, valid for one day from now
    pub fn issue_token(&self, caller: &Caller) -> ApiResult<String> {
        self.issue_token_at(caller, Utc::now().timestamp())
    }

    fn issue_token_at(&self, caller: &Caller, issued_at: i64) -> ApiResult<String> {
        let mut claims = Claims::new(caller, issued_at, self.config.token_ttl_secs);
        claims.iss = self.config.issuer.clone();
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Resolve a raw credential (optionally `Bearer `-prefixed) to a caller
    ///
    /// Every failure, including an empty or expired token, yields `None`.
    pub fn verify_token(&self, raw: &str) -> Option<Caller> {
        let token = raw.trim();
        let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim();
        if token.is_empty() {
            return None;
        }

        match self.decode_claims(token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed");
                None
            }
        }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }

    /// Hash a password with Argon2id
    pub fn hash_password(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    /// Verify a password against an Argon2id hash
    pub fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(hash)?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Simple email validation
fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 254 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }

    // Domain must have at least one dot and no empty labels
    domain.contains('.') && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), AuthConfig::new(SECRET)).unwrap()
    }

    fn caller() -> Caller {
        Caller {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.user@domain.co.uk"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("@domain.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@domain.com"));
    }

    #[test]
    fn test_token_round_trip() {
        let auth = service();
        let caller = caller();
        let token = auth.issue_token(&caller).unwrap();

        assert_eq!(auth.verify_token(&token), Some(caller.clone()));
        assert_eq!(auth.verify_token(&format!("Bearer {token}")), Some(caller));
    }

    #[test]
    fn test_garbage_and_empty_tokens_yield_no_identity() {
        let auth = service();
        assert_eq!(auth.verify_token("garbage"), None);
        assert_eq!(auth.verify_token(""), None);
        assert_eq!(auth.verify_token("Bearer "), None);
    }

    #[test]
    fn test_expired_token_yields_no_identity() {
        let auth = service();
        let two_days_ago = Utc::now().timestamp() - 2 * TOKEN_TTL_SECS;
        let token = auth.issue_token_at(&caller(), two_days_ago).unwrap();
        assert_eq!(auth.verify_token(&token), None);
    }

    #[test]
    fn test_token_expires_after_one_day() {
        let auth = service();
        let token = auth.issue_token(&caller()).unwrap();
        let claims = auth.decode_claims(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
        assert_eq!(claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new(
            Arc::new(MemoryStore::new()),
            AuthConfig::new("a-completely-different-secret-value-here"),
        )
        .unwrap();
        let token = other.issue_token(&caller()).unwrap();
        assert_eq!(service().verify_token(&token), None);
    }

    #[test]
    fn test_password_hash_round_trip() {
        let auth = service();
        let hash = auth.hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(auth.verify_password("hunter22", &hash).unwrap());
        assert!(!auth.verify_password("hunter23", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let auth = service();
        assert_matches!(
            auth.register(" ", "a@b.com", "secret1").await,
            Err(ApiError::ValidationError(_))
        );
        assert_matches!(
            auth.register("Ada", "not-an-email", "secret1").await,
            Err(ApiError::ValidationError(_))
        );
        assert_matches!(
            auth.register("Ada", "a@b.com", "short").await,
            Err(ApiError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let auth = service();
        auth.register("Ada", "ada@example.com", "secret1").await.unwrap();
        assert_matches!(
            auth.register("Ada", "ADA@example.com", "secret1").await,
            Err(ApiError::Conflict { .. })
        );
    }

    #[tokio::test]
    async fn test_login_uniform_failure() {
        let auth = service();
        auth.register("Ada", "ada@example.com", "secret1").await.unwrap();

        assert_matches!(
            auth.login("ada@example.com", "wrong-password").await,
            Err(ApiError::InvalidCredentials)
        );
        assert_matches!(
            auth.login("nobody@example.com", "secret1").await,
            Err(ApiError::InvalidCredentials)
        );

        let (user, token) = auth.login("Ada@Example.com", "secret1").await.unwrap();
        assert_eq!(auth.verify_token(&token).map(|c| c.id), Some(user.id));
    }
}
