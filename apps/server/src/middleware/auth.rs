//! Authentication middleware.

use std::sync::Arc;

use auth::TokenKind;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use task_store::TaskStore;

use crate::error::ServerError;
use crate::state::AppState;

/// Identity resolved from a validated access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: i64,
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Authentication middleware.
///
/// Extracts the access token from the Authorization header, validates it,
/// and stores the authenticated user in the request extensions. Requests
/// without a valid access token never reach the handler.
pub async fn auth_middleware<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_bearer(&request) {
        Some(token) => token,
        None => return ServerError::AuthenticationRequired.into_response(),
    };

    let claims = match state.tokens.decode(token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(e) => return ServerError::from(e).into_response(),
    };

    match claims.user_id() {
        Ok(id) => {
            request.extensions_mut().insert(AuthenticatedUser { id });
        }
        Err(e) => return ServerError::from(e).into_response(),
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_bearer_prefix_handling() {
        let auth_header = "Bearer test-token-123";
        assert_eq!(auth_header.strip_prefix("Bearer "), Some("test-token-123"));

        let auth_header = "Basic credentials";
        assert_eq!(auth_header.strip_prefix("Bearer "), None);
    }
}
