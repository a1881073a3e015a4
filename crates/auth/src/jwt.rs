//! JWT access/refresh token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AuthError, AuthResult, DEFAULT_ACCESS_LIFETIME_SECS, DEFAULT_JWT_ISSUER,
    DEFAULT_REFRESH_LIFETIME_SECS,
};

/// Which of the two token roles a JWT plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived bearer credential checked on every protected request.
    Access,
    /// Longer-lived credential used to mint new access tokens; revocable.
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// JWT claims for both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Which role this token plays. A token of the wrong kind is rejected
    /// wherever the other is expected.
    pub token_type: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// JWT ID; blacklist membership is keyed on this for refresh tokens.
    pub jti: String,
}

impl Claims {
    /// Creates new claims for a user.
    pub fn new(user_id: i64, kind: TokenKind, lifetime_secs: i64, issuer: &str) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(lifetime_secs);

        Self {
            sub: user_id.to_string(),
            token_type: kind,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Returns the user ID.
    pub fn user_id(&self) -> AuthResult<i64> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// An access/refresh token pair issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens (HS256).
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_lifetime_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_lifetime_secs: i64,
    /// Token issuer.
    pub issuer: String,
}

impl JwtConfig {
    /// Creates a new JWT configuration with default lifetimes.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_lifetime_secs: DEFAULT_ACCESS_LIFETIME_SECS,
            refresh_lifetime_secs: DEFAULT_REFRESH_LIFETIME_SECS,
            issuer: DEFAULT_JWT_ISSUER.to_string(),
        }
    }

    /// Sets the access token lifetime in seconds.
    pub fn with_access_lifetime_secs(mut self, secs: i64) -> Self {
        self.access_lifetime_secs = secs;
        self
    }

    /// Sets the refresh token lifetime in seconds.
    pub fn with_refresh_lifetime_secs(mut self, secs: i64) -> Self {
        self.refresh_lifetime_secs = secs;
        self
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

/// Issues and validates access/refresh token pairs.
#[derive(Clone)]
pub struct TokenManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.config.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Creates a new token manager.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates a single token of the given kind for a user.
    pub fn issue(&self, user_id: i64, kind: TokenKind) -> AuthResult<String> {
        let lifetime = match kind {
            TokenKind::Access => self.config.access_lifetime_secs,
            TokenKind::Refresh => self.config.refresh_lifetime_secs,
        };
        let claims = Claims::new(user_id, kind, lifetime, &self.config.issuer);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::JwtEncoding(e.to_string()))
    }

    /// Generates a fresh access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: i64) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenKind::Access)?,
            refresh: self.issue(user_id, TokenKind::Refresh)?,
        })
    }

    /// Validates and decodes a token, requiring it to be of `kind`.
    pub fn decode(&self, token: &str, kind: TokenKind) -> AuthResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        let claims = token_data.claims;

        if claims.token_type != kind {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Refresh token lifetime in seconds, for cookie max-age.
    pub fn refresh_lifetime_secs(&self) -> i64 {
        self.config.refresh_lifetime_secs
    }
}
