use actix_web::{web, HttpResponse};
use serde_json::json;

use super::store;
use crate::{
    auth::AuthenticatedUser, errors::ServerError, models::user::Credentials, services::user,
    AppState,
};

pub async fn login(
    body: web::Json<Credentials>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let credentials = body.into_inner();
    let user = web::block(move || user::login(&*store, &credentials)).await??;
    let token = env.jwt.issue(&user.id, &user.username)?;
    Ok(HttpResponse::Ok().json(json!({ "authToken": token })))
}

// a still-valid token buys a fresh expiry
pub async fn refresh(
    user: AuthenticatedUser,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let token = env.jwt.issue(&user.id, &user.username)?;
    Ok(HttpResponse::Ok().json(json!({ "authToken": token })))
}
