use actix_web::{middleware, App, HttpServer};
use anyhow::Context;
use std::net::SocketAddr;

use orgdir_catalog::{CatalogService, Directory};
use orgdir_service_api_web::middleware::{ApiKeyAuth, CorsConfig};

pub struct CreateServerArgs {
    pub directory: Directory,
    pub api_key: String,
    pub cors: CorsConfig,
    pub address: SocketAddr,
}

pub fn create_server(args: CreateServerArgs) -> anyhow::Result<actix_web::dev::Server> {
    let CreateServerArgs {
        directory,
        api_key,
        cors,
        address,
    } = args;
    let auth = ApiKeyAuth::new(api_key);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(auth.clone())
            .wrap(cors.cors())
            .service(CatalogService::rest(&directory))
    })
    .bind(address)
    .with_context(|| format!("Failed to bind http server on {}", address))?
    .run();

    log::info!("Http server listening on {}", address);
    Ok(server)
}
