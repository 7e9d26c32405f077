use actix_web::web::{get, post, Data, Json, Path, Query};
use actix_web::{HttpResponse, Scope};

use orgdir_model::params::{ActivityId, BuildingId, NearbyParams, OrganizationId, SearchParams};
use orgdir_model::NewOrganization;

use crate::directory::Directory;
use crate::error::Error;

pub fn register_endpoints(scope: Scope) -> Scope {
    // literal segments first, `{organization_id}` would shadow them
    scope
        .route(
            "/organizations/by-building/{building_id}",
            get().to(by_building),
        )
        .route(
            "/organizations/by-activity/{activity_id}",
            get().to(by_activity),
        )
        .route("/organizations/search", get().to(search))
        .route("/organizations/nearby", get().to(nearby))
        .route(
            "/organizations/{organization_id}",
            get().to(get_organization),
        )
        .route("/organizations", post().to(create_organization))
}

async fn by_building(
    directory: Data<Directory>,
    path: Path<BuildingId>,
) -> Result<HttpResponse, Error> {
    let organizations = directory.organizations_by_building(path.building_id).await?;
    Ok(HttpResponse::Ok().json(organizations))
}

async fn by_activity(
    directory: Data<Directory>,
    path: Path<ActivityId>,
) -> Result<HttpResponse, Error> {
    let organizations = directory.organizations_by_activity(path.activity_id).await?;
    Ok(HttpResponse::Ok().json(organizations))
}

async fn search(
    directory: Data<Directory>,
    query: Query<SearchParams>,
) -> Result<HttpResponse, Error> {
    let organizations = directory.organizations_by_name(query.name.as_deref()).await?;
    Ok(HttpResponse::Ok().json(organizations))
}

async fn nearby(
    directory: Data<Directory>,
    query: Query<NearbyParams>,
) -> Result<HttpResponse, Error> {
    let organizations = directory.organizations_nearby(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(organizations))
}

async fn get_organization(
    directory: Data<Directory>,
    path: Path<OrganizationId>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(directory.organization(path.organization_id).await?))
}

async fn create_organization(
    directory: Data<Directory>,
    body: Json<NewOrganization>,
) -> Result<HttpResponse, Error> {
    let organization = directory.create_organization(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(organization))
}
