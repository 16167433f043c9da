//! Public pages: home, article search, about and the contact form.

use actix_web::{HttpResponse, web};

use quill_core::domain::Message;
use quill_shared::ApiResponse;
use quill_shared::dto::{AboutPage, ArticlesPage, ArticlesQuery, ContactRequest, HomePage};
use quill_shared::text::{CARD_EXCERPT_LENGTH, LIST_EXCERPT_LENGTH};

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Number of post cards on the home page.
const HOME_POST_COUNT: u64 = 6;

/// GET /
pub async fn home(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let latest = state.services.posts.latest_posts(HOME_POST_COUNT).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(HomePage {
        latest_posts: latest
            .into_iter()
            .map(|p| views::post_summary(p, CARD_EXCERPT_LENGTH))
            .collect(),
    })))
}

/// GET /articles?q=&page=&size=
pub async fn articles(
    state: web::Data<AppState>,
    query: web::Query<ArticlesQuery>,
) -> AppResult<HttpResponse> {
    let ArticlesQuery { q, page, size } = query.into_inner();
    let keyword = q
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let results = state
        .services
        .posts
        .search_posts(
            keyword.as_deref(),
            page.unwrap_or(0),
            size.unwrap_or(state.default_page_size),
        )
        .await?;

    let message = match (&keyword, results.total_items) {
        (Some(k), 0) => Some(format!("No article matches \"{k}\"")),
        _ => None,
    };
    let page = ArticlesPage {
        query: keyword,
        results: views::page(results, |p| views::post_summary(p, LIST_EXCERPT_LENGTH)),
    };

    Ok(HttpResponse::Ok().json(match message {
        Some(message) => ApiResponse::ok_with_message(page, message),
        None => ApiResponse::ok(page),
    }))
}

/// GET /about
pub async fn about() -> HttpResponse {
    let features = [
        "Article publishing",
        "Comments on every article",
        "Keyword search with pagination",
        "Contact form reviewed by the administrators",
        "Sign-in through an OpenID Connect provider",
    ];
    let technologies = ["Rust", "actix-web", "SeaORM", "PostgreSQL"];

    HttpResponse::Ok().json(ApiResponse::ok(AboutPage {
        title: "About this site".to_string(),
        description: "A content management platform where readers and writers share \
                      articles, comment on them and get in touch with the editors."
            .to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        technologies: technologies.iter().map(|t| t.to_string()).collect(),
    }))
}

/// POST /contact
pub async fn contact(
    state: web::Data<AppState>,
    body: web::Json<ContactRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let sent = state
        .services
        .messages
        .send(Message::new(req.name, req.email, req.subject, req.content))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        views::message(sent),
        "Your message has been sent",
    )))
}
