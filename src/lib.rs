use std::sync::Arc;

use actix_web::web;

#[macro_use]
extern crate diesel;

pub mod auth;
pub mod config;
pub mod errors;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod services;
pub mod store;
pub mod utils;

use auth::JwtKeys;
use errors::ServerError;
use store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt: JwtKeys) -> Self {
        AppState { store, jwt }
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ServerError::InvalidField(format!("Invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ServerError::InvalidField(format!("Invalid query string: {}", err)).into()
    })
}

/// Mounts every route. Expects `web::Data<AppState>` to be registered on the app.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/", web::get().to(handlers::index))
        .route("/login", web::post().to(handlers::token::login))
        .route("/refresh", web::post().to(handlers::token::refresh))
        .route("/users", web::post().to(handlers::user::new))
        .service(
            web::scope("/notes")
                .route("", web::get().to(handlers::note::list))
                .route("", web::post().to(handlers::note::new))
                .route("/{id}", web::get().to(handlers::note::get))
                .route("/{id}", web::put().to(handlers::note::update))
                .route("/{id}", web::delete().to(handlers::note::del)),
        )
        .service(
            web::scope("/folders")
                .route("", web::get().to(handlers::folder::list))
                .route("", web::post().to(handlers::folder::new))
                .route("/{id}", web::get().to(handlers::folder::get))
                .route("/{id}", web::put().to(handlers::folder::update))
                .route("/{id}", web::delete().to(handlers::folder::del)),
        )
        .service(
            web::scope("/tags")
                .route("", web::get().to(handlers::tag::list))
                .route("", web::post().to(handlers::tag::new))
                .route("/{id}", web::get().to(handlers::tag::get))
                .route("/{id}", web::put().to(handlers::tag::update))
                .route("/{id}", web::delete().to(handlers::tag::del)),
        );
}
