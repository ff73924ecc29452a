use std::{io, sync::Arc};

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};

use noteful::{
    auth::JwtKeys,
    config::Config,
    store::{MemoryStore, PgStore, Store},
    AppState,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config =
        Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => Arc::new(
            PgStore::connect(database_url)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
        ),
        None => {
            log::warn!("DATABASE_URL is not set, notes are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let state = web::Data::new(AppState::new(
        store,
        JwtKeys::new(&config.secret_key, config.jwt_expiry_secs),
    ));

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(config.rate_limit_replenish_ms)
        .burst_size(config.rate_limit_burst)
        .finish()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "rate limit values must be greater than zero",
            )
        })?;

    log::info!("listening on 0.0.0.0:{}", config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .expose_headers(vec![actix_web::http::header::LOCATION])
                    .max_age(3600),
            )
            .wrap(Governor::new(&governor_conf))
            .wrap(Logger::default())
            .configure(noteful::routes)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
