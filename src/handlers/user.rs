use actix_web::{web, HttpRequest, HttpResponse};

use super::{created, store};
use crate::{errors::ServerError, models::user::UserInput, services::user, AppState};

pub async fn new(
    req: HttpRequest,
    input: web::Json<UserInput>,
    env: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let store = store(&env);
    let input = input.into_inner();
    let registered = web::block(move || user::register(&*store, input)).await??;
    Ok(created(&req, &registered.id, &registered))
}
