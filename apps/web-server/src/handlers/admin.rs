//! Moderation routes. Every handler requires the admin role.

use actix_web::{HttpResponse, web};

use quill_core::domain::Role;
use quill_shared::ApiResponse;
use quill_shared::dto::{AccountUpdateRequest, DashboardView, MessagesPage, MessagesQuery, PageQuery};
use quill_shared::text::LIST_EXCERPT_LENGTH;

use super::views;
use crate::middleware::auth::AdminUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /admin
pub async fn dashboard(
    state: web::Data<AppState>,
    AdminUser(actor): AdminUser,
) -> AppResult<HttpResponse> {
    let stats = state.services.admin.dashboard(&actor).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(DashboardView {
        users: stats.users,
        posts: stats.posts,
        comments: stats.comments,
        unread_messages: stats.unread_messages,
    })))
}

/// GET /admin/posts?page=&size=
pub async fn posts(
    state: web::Data<AppState>,
    AdminUser(_): AdminUser,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .services
        .posts
        .list_posts(
            query.page.unwrap_or(0),
            query.size.unwrap_or(state.default_page_size),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::page(posts, |p| {
        views::post_summary(p, LIST_EXCERPT_LENGTH)
    }))))
}

/// DELETE /admin/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    AdminUser(actor): AdminUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .services
        .posts
        .delete_post(&actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Article deleted")))
}

/// GET /admin/comments?page=&size=
pub async fn comments(
    state: web::Data<AppState>,
    AdminUser(actor): AdminUser,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let comments = state
        .services
        .comments
        .recent_comments(
            &actor,
            query.page.unwrap_or(0),
            query.size.unwrap_or(state.default_page_size),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::page(comments, views::comment))))
}

/// DELETE /admin/comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    AdminUser(actor): AdminUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .services
        .comments
        .delete_comment(&actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Comment deleted")))
}

/// GET /admin/messages?unread=
pub async fn messages(
    state: web::Data<AppState>,
    AdminUser(_): AdminUser,
    query: web::Query<MessagesQuery>,
) -> AppResult<HttpResponse> {
    let unread_only = query.unread;
    let messages = if unread_only {
        state.services.messages.unread_messages().await?
    } else {
        state.services.messages.all_messages().await?
    };
    let unread_count = state.services.messages.unread_count().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessagesPage {
        unread_only,
        unread_count,
        messages: messages.into_iter().map(views::message).collect(),
    })))
}

/// POST /admin/messages/{id}/read
pub async fn mark_message_read(
    state: web::Data<AppState>,
    AdminUser(_): AdminUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let message = state
        .services
        .messages
        .mark_as_read(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::message(message),
        "Message marked as read",
    )))
}

/// DELETE /admin/messages/{id}
pub async fn delete_message(
    state: web::Data<AppState>,
    AdminUser(_): AdminUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state.services.messages.delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Message deleted")))
}

/// GET /admin/users
pub async fn users(
    state: web::Data<AppState>,
    AdminUser(actor): AdminUser,
) -> AppResult<HttpResponse> {
    let users = state.services.users.list_users(&actor).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        users.into_iter().map(views::user).collect::<Vec<_>>(),
    )))
}

/// PUT /admin/users/{id}
pub async fn update_user(
    state: web::Data<AppState>,
    AdminUser(actor): AdminUser,
    path: web::Path<i64>,
    body: web::Json<AccountUpdateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let role = req
        .role
        .as_deref()
        .map(|r| Role::parse(r).ok_or_else(|| AppError::BadRequest(format!("unknown role {r}"))))
        .transpose()?;

    let user = state
        .services
        .users
        .update_account(&actor, path.into_inner(), role, req.active)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::user(user),
        "Account updated",
    )))
}

/// DELETE /admin/users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    AdminUser(actor): AdminUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .services
        .users
        .delete_user(&actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Account deleted")))
}
