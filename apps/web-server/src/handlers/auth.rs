//! Local account endpoints and the token owner's account.

use actix_web::{HttpResponse, web};

use quill_core::domain::{User, mask_email};
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::views;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user)?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    tracing::info!(user_email = %mask_email(&req.email), "Registering local account");

    let user = state
        .services
        .users
        .register_local(&req.email, &req.name, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(issue_token(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .services
        .users
        .login_local(&req.email, &req.password)
        .await
        .inspect_err(|_| {
            tracing::info!(user_email = %mask_email(&req.email), "Local login refused");
        })?;

    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
) -> AppResult<HttpResponse> {
    let user = state.services.users.get(actor.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::user(user))))
}
