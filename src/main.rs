use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use billsplit::config::Config;
use billsplit::routes;
use billsplit::store::{GroupStore, MongoGroupStore};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = Config::parse();
    info!(database = %config.database, "connecting to MongoDB");
    let store = MongoGroupStore::connect(&config.mongodb_uri, &config.database)
        .await
        .map_err(|e| std::io::Error::other(format!("failed to connect to MongoDB: {e}")))?;
    info!("connected");

    let store = web::Data::from(Arc::new(store) as Arc<dyn GroupStore>);
    let presentation = web::Data::new(config.presentation());
    let allowed_origins = config.allowed_origins.clone();

    info!(bind = %config.bind, "starting server");
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(presentation.clone())
            .configure(routes::configure)
    })
    .bind(config.bind)?
    .run()
    .await
}

fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
}
