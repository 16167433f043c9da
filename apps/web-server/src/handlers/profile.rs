//! The signed-in user's own account and profile.

use actix_web::{HttpResponse, web};

use quill_core::domain::PostWithAuthor;
use quill_core::services::AuthContext;
use quill_shared::ApiResponse;
use quill_shared::dto::{PasswordChangeRequest, ProfilePage, ProfileUpdateRequest};
use quill_shared::text::LIST_EXCERPT_LENGTH;

use super::views;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

async fn profile_page(state: &AppState, actor: &AuthContext) -> AppResult<ProfilePage> {
    let user = state.services.users.get(actor.user_id).await?;
    let profile = state.services.profiles.profile_for(actor.user_id).await?;
    let author = user.summary();
    let posts = state.services.posts.posts_by_author(actor.user_id).await?;

    Ok(ProfilePage {
        user: views::user(user),
        bio: profile.bio,
        description: profile.description,
        posts: posts
            .into_iter()
            .map(|post| {
                views::post_summary(
                    PostWithAuthor {
                        post,
                        author: author.clone(),
                    },
                    LIST_EXCERPT_LENGTH,
                )
            })
            .collect(),
    })
}

/// GET /user/profile
pub async fn show(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
) -> AppResult<HttpResponse> {
    let page = profile_page(&state, &actor).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// PUT /user/profile
pub async fn update(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    body: web::Json<ProfileUpdateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    state
        .services
        .profiles
        .update_profile(actor.user_id, req.name.as_deref(), req.bio, req.description)
        .await?;

    let page = profile_page(&state, &actor).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(page, "Profile saved")))
}

/// PUT /user/password
pub async fn change_password(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    body: web::Json<PasswordChangeRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    state
        .services
        .users
        .change_password(&actor, &req.current_password, &req.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Password changed")))
}
