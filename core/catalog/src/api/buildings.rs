use actix_web::web::{get, post, Data, Json};
use actix_web::{HttpResponse, Scope};

use orgdir_model::NewBuilding;

use crate::directory::Directory;
use crate::error::Error;

pub fn register_endpoints(scope: Scope) -> Scope {
    scope
        .route("/buildings", get().to(list_buildings))
        .route("/buildings", post().to(create_building))
}

async fn list_buildings(directory: Data<Directory>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(directory.buildings().await?))
}

async fn create_building(
    directory: Data<Directory>,
    body: Json<NewBuilding>,
) -> Result<HttpResponse, Error> {
    let building = directory.create_building(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(building))
}
