use actix_web::web::Data;
use actix_web::Scope;

use orgdir_service_api_web::extractors::{json_config, path_config, query_config};
use orgdir_service_api_web::ExtendableScope;

use crate::directory::Directory;

mod activities;
mod buildings;
mod organizations;

pub const CATALOG_API_PATH: &str = "";

pub fn api_scope(scope: Scope) -> Scope {
    scope
        .extend(buildings::register_endpoints)
        .extend(activities::register_endpoints)
        .extend(organizations::register_endpoints)
}

pub fn web_scope(directory: &Directory) -> Scope {
    Scope::new(CATALOG_API_PATH)
        .app_data(Data::new(directory.clone()))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .extend(api_scope)
}
