#![deny(missing_docs)]
//! SeoLens server executable.
//!
//! Hosts HTTP endpoints for page analysis, competitor comparison and recent history.

mod config;
mod openapi;
mod routes;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use std::io::{Error, ErrorKind};

#[cfg(not(test))]
use seolens_core::HttpFetcher;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::routes::{
    AppState, analyze, compare, history_analyses, history_comparisons, openapi_json,
};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config =
        ServerConfig::from_env().map_err(|message| Error::new(ErrorKind::InvalidInput, message))?;

    // The blocking client must exist before the Actix runtime starts.
    let fetcher = HttpFetcher::new(&config.fetch).map_err(|err| Error::other(err.to_string()))?;
    let state = AppState::new(Box::new(fetcher)).map_err(|err| Error::other(err.to_string()))?;
    let state = web::Data::new(state);

    let ServerConfig {
        host,
        port,
        ui_origins,
        ..
    } = config;
    log::info!("listening on {host}:{port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &ui_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .service(analyze)
                .service(compare)
                .service(history_analyses)
                .service(history_comparisons)
                .service(openapi_json)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
