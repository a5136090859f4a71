use crate::common::AuthError;
use crate::domains::auth::Claims;
use crate::kernel::ServerDeps;
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::debug;

/// Authenticated user information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl AuthUser {
    /// Service-role tokens are always admin; user tokens are admin when the
    /// email is on the configured list.
    fn from_claims(claims: Claims, deps: &ServerDeps) -> Self {
        let is_admin = claims.is_service_role()
            || claims
                .email
                .as_deref()
                .is_some_and(|email| deps.is_admin_email(email));
        Self {
            user_id: claims.sub,
            email: claims.email,
            is_admin,
        }
    }
}

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds AuthUser to request extensions.
/// If no token or invalid token, request continues without AuthUser (public access).
pub async fn jwt_auth_middleware(deps: ServerDeps, mut request: Request, next: Next) -> Response {
    let auth_user = extract_auth_user(&request, &deps);

    if let Some(user) = auth_user {
        debug!("Authenticated user: {} (admin: {})", user.user_id, user.is_admin);
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Admin gate for the admin router
///
/// Runs after `jwt_auth_middleware`; rejects anonymous callers with 401 and
/// signed-in non-admins with 403.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthError> {
    match request.extensions().get::<AuthUser>() {
        None => Err(AuthError::AuthenticationRequired),
        Some(user) if !user.is_admin => Err(AuthError::AdminRequired),
        Some(_) => Ok(next.run(request).await),
    }
}

/// Extract and verify JWT token from request
fn extract_auth_user(request: &Request, deps: &ServerDeps) -> Option<AuthUser> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = deps.jwt_service.verify_token(token).ok()?;

    Some(AuthUser::from_claims(claims, deps))
}
