//! Authentication extractors.
//!
//! [`Identity`] only checks the bearer token. [`CurrentUser`] additionally
//! resolves the token to the persisted account, provisioning it on first
//! sight, and is what handlers acting on behalf of a user take.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};

use quill_core::ports::{AuthError, TokenClaims};
use quill_core::services::AuthContext;

use crate::middleware::error::AppError;
use crate::state::AppState;

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>().cloned().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("server configuration error".to_string())
    })
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

/// Validated token claims.
#[derive(Debug, Clone)]
pub struct Identity(pub TokenClaims);

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = app_state(req).and_then(|state| {
            let token = bearer_token(req)?;
            Ok(Identity(state.tokens.validate_token(token)?))
        });
        ready(result)
    }
}

/// The account a request acts for.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload).into_inner();
        let state = app_state(req);

        Box::pin(async move {
            let Identity(claims) = identity?;
            let context = state?.services.users.resolve_identity(&claims).await?;
            Ok(CurrentUser(context))
        })
    }
}

/// A current user holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthContext);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = CurrentUser::from_request(req, payload);

        Box::pin(async move {
            let CurrentUser(context) = user.await?;
            if !context.is_admin() {
                tracing::warn!(user_id = context.user_id, "Non-admin tried an admin route");
                return Err(AppError::Forbidden);
            }
            Ok(AdminUser(context))
        })
    }
}

/// Optional current user - anonymous when no valid token is sent.
pub struct OptionalUser(pub Option<AuthContext>);

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let has_token = req.headers().contains_key(header::AUTHORIZATION);
        let user = CurrentUser::from_request(req, payload);

        Box::pin(async move {
            if !has_token {
                return Ok(OptionalUser(None));
            }
            match user.await {
                Ok(CurrentUser(context)) => Ok(OptionalUser(Some(context))),
                Err(AppError::Unauthorized | AppError::TokenExpired) => Ok(OptionalUser(None)),
                Err(e) => Err(e),
            }
        })
    }
}
