use actix_web::{web, HttpRequest, HttpResponse};

use super::{created, store};
use crate::{
    auth::AuthenticatedUser, errors::ServerError, models::folder::FolderInput,
    services::folder, AppState,
};

pub async fn list(
    user: AuthenticatedUser,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let folders = web::block(move || folder::list(&*store, &user.id)).await??;
    Ok(HttpResponse::Ok().json(folders))
}

pub async fn get(
    user: AuthenticatedUser,
    folder_id: web::Path<String>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let folder_id = folder_id.into_inner();
    let found = web::block(move || folder::get(&*store, &user.id, &folder_id)).await??;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn new(
    req: HttpRequest,
    user: AuthenticatedUser,
    input: web::Json<FolderInput>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let input = input.into_inner();
    let saved = web::block(move || folder::create(&*store, &user.id, input)).await??;
    Ok(created(&req, &saved.id, &saved))
}

pub async fn update(
    user: AuthenticatedUser,
    folder_id: web::Path<String>,
    input: web::Json<FolderInput>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let folder_id = folder_id.into_inner();
    let input = input.into_inner();
    let saved =
        web::block(move || folder::update(&*store, &user.id, &folder_id, input)).await??;
    Ok(HttpResponse::Ok().json(saved))
}

pub async fn del(
    user: AuthenticatedUser,
    folder_id: web::Path<String>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let folder_id = folder_id.into_inner();
    web::block(move || folder::delete(&*store, &user.id, &folder_id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
