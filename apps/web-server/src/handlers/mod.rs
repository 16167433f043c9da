//! HTTP handlers and route configuration.
//!
//! Handlers extract the input and the acting user, call one service and turn
//! the result into a JSON page model (`ApiResponse`) or an RFC 7807 problem.

mod admin;
mod auth;
mod health;
mod pages;
mod posts;
mod profile;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;

/// Malformed bodies, queries and paths become 400 problems.
fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    extractor_config(cfg);

    cfg
        // Public pages
        .route("/", web::get().to(pages::home))
        .route("/articles", web::get().to(pages::articles))
        .route("/about", web::get().to(pages::about))
        .route("/contact", web::post().to(pages::contact))
        // Signed-in users
        .service(
            web::scope("/user")
                .route("/article/{id}", web::get().to(posts::show))
                .route("/article/{id}", web::put().to(posts::update))
                .route("/article/{id}", web::delete().to(posts::delete))
                .route("/article/{id}/comments", web::post().to(posts::add_comment))
                .route("/create-post", web::post().to(posts::create))
                .route("/comments/{id}", web::put().to(posts::update_comment))
                .route("/comments/{id}", web::delete().to(posts::delete_comment))
                .route("/profile", web::get().to(profile::show))
                .route("/profile", web::put().to(profile::update))
                .route("/password", web::put().to(profile::change_password)),
        )
        // Administrators
        .service(
            web::scope("/admin")
                .route("", web::get().to(admin::dashboard))
                .route("/posts", web::get().to(admin::posts))
                .route("/posts/{id}", web::delete().to(admin::delete_post))
                .route("/comments", web::get().to(admin::comments))
                .route("/comments/{id}", web::delete().to(admin::delete_comment))
                .route("/messages", web::get().to(admin::messages))
                .route("/messages/{id}/read", web::post().to(admin::mark_message_read))
                .route("/messages/{id}", web::delete().to(admin::delete_message))
                .route("/users", web::get().to(admin::users))
                .route("/users/{id}", web::put().to(admin::update_user))
                .route("/users/{id}", web::delete().to(admin::delete_user)),
        )
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                ),
        );
}
