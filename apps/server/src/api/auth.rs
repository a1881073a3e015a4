//! Authentication API endpoints.

use std::sync::Arc;

use api_types::{
    DetailResponse, LoginRequest, LoginResponse, RefreshResponse, RegisterRequest,
    RegisterResponse, UpdateProfileRequest, UserProfile,
};
use auth::{AuthError, TokenKind};
use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use entities::{NewUser, PASSWORD_MIN_LEN, USERNAME_MAX_LEN, USERNAME_MIN_LEN};
use task_store::TaskStore;

use crate::config::Config;
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// Name of the refresh-token cookie.
const REFRESH_COOKIE: &str = "refresh_token";

/// Builds the refresh-token cookie. One consistent policy everywhere:
/// HttpOnly, SameSite=Lax, path `/`, Secure unless disabled in config.
fn refresh_cookie(config: &Config, value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, value))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// An immediately-expiring empty cookie, used to clear the refresh token.
fn clear_refresh_cookie(config: &Config) -> Cookie<'static> {
    refresh_cookie(config, String::new(), 0)
}

fn validate_registration(request: &RegisterRequest) -> ServerResult<()> {
    let username_len = request.username.chars().count();
    if username_len < USERNAME_MIN_LEN {
        return Err(ServerError::validation(
            "username",
            format!("Username must be at least {USERNAME_MIN_LEN} characters."),
        ));
    }
    if username_len > USERNAME_MAX_LEN {
        return Err(ServerError::validation(
            "username",
            format!("Username must be at most {USERNAME_MAX_LEN} characters."),
        ));
    }
    if request.password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ServerError::validation(
            "password",
            format!("Password must be at least {PASSWORD_MIN_LEN} characters."),
        ));
    }
    if request.first_name.trim().is_empty() {
        return Err(ServerError::validation("first_name", "This field is required."));
    }
    Ok(())
}

/// Registers a new user and issues their first token pair.
pub async fn register<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<RegisterRequest>,
) -> ServerResult<(StatusCode, Json<RegisterResponse>)> {
    validate_registration(&request)?;

    let password_hash = auth::hash_password(&request.password)?;
    let new_user = NewUser::new(request.username, password_hash, request.first_name)
        .with_last_name(request.last_name.unwrap_or_default());

    // The store's unique constraint backs this up against concurrent
    // registrations; a collision surfaces as a username validation error.
    let user = state.store.create_user(new_user).await?;
    let pair = state.tokens.issue_pair(user.id)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserProfile::from(&user),
            access: pair.access,
            refresh: pair.refresh,
        }),
    ))
}

/// Logs a user in: access token in the body, refresh token in the cookie.
pub async fn login<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ServerResult<(CookieJar, Json<LoginResponse>)> {
    // One uniform failure path: never reveal whether the username exists.
    let user = match state.store.get_user_by_username(&request.username).await? {
        Some(user) if auth::verify_password(&request.password, &user.password_hash) => user,
        _ => return Err(ServerError::Auth(AuthError::InvalidCredentials)),
    };

    let pair = state.tokens.issue_pair(user.id)?;
    let jar = jar.add(refresh_cookie(
        &state.config,
        pair.refresh,
        state.tokens.refresh_lifetime_secs(),
    ));

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        Json(LoginResponse {
            user: UserProfile::from(&user),
            access: pair.access,
        }),
    ))
}

/// Mints a new access token from the refresh cookie.
///
/// Refresh tokens are not rotated; the same cookie stays valid until it
/// expires or is blacklisted by logout.
pub async fn refresh<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
) -> ServerResult<Json<RefreshResponse>> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(ServerError::AuthenticationRequired)?;

    let claims = state.tokens.decode(&token, TokenKind::Refresh)?;

    if state
        .blacklist
        .is_revoked(&claims.jti)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
    {
        return Err(ServerError::Auth(AuthError::TokenRevoked));
    }

    let user_id = claims.user_id()?;
    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or(ServerError::Auth(AuthError::InvalidToken))?;

    let access = state.tokens.issue(user_id, TokenKind::Access)?;

    Ok(Json(RefreshResponse {
        access,
        user: UserProfile::from(&user),
    }))
}

/// Logs the user out.
///
/// Best-effort: blacklists the refresh token when the cookie decodes, and
/// always clears the cookie and reports success, even when the token was
/// missing or invalid.
pub async fn logout<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    jar: CookieJar,
) -> (CookieJar, Json<DetailResponse>) {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        match state.tokens.decode(cookie.value(), TokenKind::Refresh) {
            Ok(claims) => {
                let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
                if let Err(e) = state.blacklist.revoke(&claims.jti, expires_at).await {
                    tracing::warn!(error = %e, "Failed to blacklist refresh token at logout");
                } else {
                    tracing::info!("Refresh token blacklisted");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable refresh token at logout");
            }
        }
    }

    let jar = jar.add(clear_refresh_cookie(&state.config));
    (jar, Json(DetailResponse::new("Successfully logged out.")))
}

/// Returns the authenticated user's profile.
pub async fn me<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> ServerResult<Json<UserProfile>> {
    let user = state
        .store
        .get_user(actor.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(UserProfile::from(&user)))
}

/// Updates the authenticated user's name fields.
pub async fn update_me<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> ServerResult<Json<UserProfile>> {
    let mut user = state
        .store
        .get_user(actor.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    if let Some(first_name) = request.first_name {
        if first_name.trim().is_empty() {
            return Err(ServerError::validation("first_name", "This field is required."));
        }
        user.first_name = first_name;
    }
    if let Some(last_name) = request.last_name {
        user.last_name = last_name;
    }

    let user = state.store.update_user(user).await?;
    Ok(Json(UserProfile::from(&user)))
}
