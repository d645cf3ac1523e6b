//! Single binary web server for the league API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8081 by default.
//! Override with env: HOST, PORT, DATA_FILE (JSON snapshot kept across restarts).

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use bbx_tournament::{api, MemoryStore, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = match &config.data_file {
        Some(path) => MemoryStore::open(path).map_err(std::io::Error::other)?,
        None => {
            log::warn!("DATA_FILE not set, records are kept in memory only");
            MemoryStore::new()
        }
    };
    let state = Data::new(store);

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
