use actix_web::{web, HttpRequest, HttpResponse};

use super::{created, store};
use crate::{
    auth::AuthenticatedUser, errors::ServerError, models::tag::TagInput,
    services::tag, AppState,
};

pub async fn list(
    user: AuthenticatedUser,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let tags = web::block(move || tag::list(&*store, &user.id)).await??;
    Ok(HttpResponse::Ok().json(tags))
}

pub async fn get(
    user: AuthenticatedUser,
    tag_id: web::Path<String>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let tag_id = tag_id.into_inner();
    let found = web::block(move || tag::get(&*store, &user.id, &tag_id)).await??;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn new(
    req: HttpRequest,
    user: AuthenticatedUser,
    input: web::Json<TagInput>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let input = input.into_inner();
    let saved = web::block(move || tag::create(&*store, &user.id, input)).await??;
    Ok(created(&req, &saved.id, &saved))
}

pub async fn update(
    user: AuthenticatedUser,
    tag_id: web::Path<String>,
    input: web::Json<TagInput>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let tag_id = tag_id.into_inner();
    let input = input.into_inner();
    let saved =
        web::block(move || tag::update(&*store, &user.id, &tag_id, input)).await??;
    Ok(HttpResponse::Ok().json(saved))
}

pub async fn del(
    user: AuthenticatedUser,
    tag_id: web::Path<String>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let tag_id = tag_id.into_inner();
    web::block(move || tag::delete(&*store, &user.id, &tag_id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
