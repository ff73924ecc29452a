use actix_web::{web, HttpRequest, HttpResponse};

use super::{created, store};
use crate::{
    auth::AuthenticatedUser, errors::ServerError, filter::NoteQuery, models::note::NoteInput,
    services::note, AppState,
};

pub async fn list(
    user: AuthenticatedUser,
    query: web::Query<NoteQuery>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let query = query.into_inner();
    let notes = web::block(move || note::list(&*store, &user.id, query)).await??;
    Ok(HttpResponse::Ok().json(notes))
}

pub async fn get(
    user: AuthenticatedUser,
    note_id: web::Path<String>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let note_id = note_id.into_inner();
    let note = web::block(move || note::get(&*store, &user.id, &note_id)).await??;
    Ok(HttpResponse::Ok().json(note))
}

pub async fn new(
    req: HttpRequest,
    user: AuthenticatedUser,
    input: web::Json<NoteInput>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let input = input.into_inner();
    let note = web::block(move || note::create(&*store, &user.id, input)).await??;
    Ok(created(&req, &note.id, &note))
}

pub async fn update(
    user: AuthenticatedUser,
    note_id: web::Path<String>,
    input: web::Json<NoteInput>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let note_id = note_id.into_inner();
    let input = input.into_inner();
    let note = web::block(move || note::update(&*store, &user.id, &note_id, input)).await??;
    Ok(HttpResponse::Ok().json(note))
}

pub async fn del(
    user: AuthenticatedUser,
    note_id: web::Path<String>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let note_id = note_id.into_inner();
    web::block(move || note::delete(&*store, &user.id, &note_id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
