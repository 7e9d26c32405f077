use actix_web::web::{get, post, Data, Json};
use actix_web::{HttpResponse, Scope};

use orgdir_model::NewActivity;

use crate::directory::Directory;
use crate::error::Error;

pub fn register_endpoints(scope: Scope) -> Scope {
    scope
        .route("/activities", get().to(list_activities))
        .route("/activities", post().to(create_activity))
}

async fn list_activities(directory: Data<Directory>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(directory.activities().await?))
}

async fn create_activity(
    directory: Data<Directory>,
    body: Json<NewActivity>,
) -> Result<HttpResponse, Error> {
    let activity = directory.create_activity(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(activity))
}
