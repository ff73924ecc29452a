use std::sync::Arc;

use actix_web::{http::header, web, HttpRequest, HttpResponse};

use crate::{store::Store, AppState};

pub mod folder;
pub mod note;
pub mod tag;
pub mod token;
pub mod user;

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().finish()
}

fn store(state: &web::Data<AppState>) -> Arc<dyn Store> {
    Arc::clone(&state.store)
}

/// `201 Created` with a `Location` pointing at the new resource.
fn created<T: serde::Serialize>(req: &HttpRequest, id: &str, body: &T) -> HttpResponse {
    let location = format!("{}/{}", req.path().trim_end_matches('/'), id);
    HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(body)
}
