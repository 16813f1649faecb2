use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user_routes())
        .nest("/blog", blog_routes())
        .nest("/comment", comment_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/{id}",
            get(handlers::user::get_user)
                .patch(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
}

fn blog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::blog::list_blogs).post(handlers::blog::create_blog),
        )
        .route(
            "/{id}",
            get(handlers::blog::get_blog)
                .patch(handlers::blog::update_blog)
                .delete(handlers::blog::delete_blog),
        )
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
        .route(
            "/{blog_id}/{user_id}",
            get(handlers::comment::get_comment)
                .patch(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
}
