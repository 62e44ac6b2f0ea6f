mod config;
mod error;
mod middleware;
mod models;
mod prompts;
mod routes;
mod types;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use async_openai::{config::OpenAIConfig, Client};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub oai_client: Client<OpenAIConfig>,
}

// Extractor failures (malformed JSON, bad query/path values) must render the
// same `{message}` body as every other client error, not actix's plain text.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| error::ApiError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| error::ApiError::Validation(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| error::ApiError::Validation(err.to_string()).into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_config = Arc::new(AppConfig::from_env()?);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&app_config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let mut oai_config = OpenAIConfig::new().with_api_key(&app_config.openai_api_key);
    if let Some(api_base) = &app_config.openai_api_base {
        oai_config = oai_config.with_api_base(api_base);
    }

    let app_state = Arc::new(AppState {
        pool,
        oai_client: Client::with_config(oai_config),
    });

    let port = app_config.port;
    info!("Listening on 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .service(
                web::scope("/auth")
                    .service(routes::auth::signup)
                    .service(routes::auth::login),
            )
            .service(
                web::scope("/profile")
                    .wrap(middleware::auth::Authentication {
                        app_config: app_config.clone(),
                    })
                    .service(routes::profile::get_profile)
                    .service(routes::profile::update_profile),
            )
            .service(routes::tutors::list_tutors)
            .service(
                web::scope("/tutoring-requests")
                    .service(routes::requests::create_request)
                    .service(routes::requests::list_requests)
                    .service(routes::requests::get_request)
                    .service(routes::requests::update_request),
            )
            .service(
                web::scope("/session-feedbacks")
                    .service(routes::feedback::create_feedback)
                    .service(routes::feedback::list_feedbacks),
            )
            .service(
                web::scope("/learning-suggestions")
                    .service(routes::suggestions::suggest_materials),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}
