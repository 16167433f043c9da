//! Articles and their comments, on behalf of the signed-in user.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::domain::PostDraft;
use quill_shared::ApiResponse;
use quill_shared::dto::{ArticleView, CommentRequest, PostRequest};

use super::views;
use crate::middleware::auth::{CurrentUser, OptionalUser};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Article page: the article plus what the viewer may do with it.
#[derive(Serialize)]
pub struct ArticlePage {
    #[serde(flatten)]
    pub article: ArticleView,
    pub can_edit: bool,
}

/// GET /user/article/{id}
pub async fn show(
    state: web::Data<AppState>,
    viewer: OptionalUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let detail = state.services.posts.get_post(path.into_inner()).await?;
    let can_edit = viewer
        .0
        .is_some_and(|ctx| ctx.can_modify(detail.post.author_id));

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ArticlePage {
        article: views::article(detail),
        can_edit,
    })))
}

/// POST /user/create-post
pub async fn create(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let saved = state
        .services
        .posts
        .save_post(PostDraft {
            id: None,
            title: req.title,
            content: req.content,
            author_id: Some(actor.user_id),
        })
        .await?;

    let id = saved.id.unwrap_or_default();
    let detail = state.services.posts.get_post(id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        views::article(detail),
        "Article published",
    )))
}

/// PUT /user/article/{id}
pub async fn update(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<i64>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    state
        .services
        .posts
        .edit_post(&actor, id, req.title, req.content)
        .await?;

    let detail = state.services.posts.get_post(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        views::article(detail),
        "Article updated",
    )))
}

/// DELETE /user/article/{id}
pub async fn delete(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .services
        .posts
        .delete_post(&actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Article deleted")))
}

/// POST /user/article/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    state
        .services
        .comments
        .add_comment(&actor, post_id, body.into_inner().content)
        .await?;

    let comments = state.services.comments.comments_for_post(post_id).await?;
    let comments: Vec<_> = comments.into_iter().map(views::comment).collect();
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(comments, "Comment added")))
}

/// PUT /user/comments/{id}
pub async fn update_comment(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .services
        .comments
        .edit_comment(&actor, path.into_inner(), body.into_inner().content)
        .await?;

    let comments = state
        .services
        .comments
        .comments_for_post(comment.post_id)
        .await?;
    let comments: Vec<_> = comments.into_iter().map(views::comment).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(comments, "Comment updated")))
}

/// DELETE /user/comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .services
        .comments
        .delete_comment(&actor, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Comment deleted")))
}
