//! Query engine over the catalog store.
//!
//! [`Directory`] is the single entry point used by the REST handlers and the
//! seeding bootstrap. It owns a handle to the connection pool and the catalog
//! configuration, resolves request parameters into store queries and maps
//! missing references to [`Error::NotFound`].

use orgdir_geo::{Area, BoundingBox, Point};
use orgdir_model::params::NearbyParams;
use orgdir_model::{Activity, Building, NewActivity, NewBuilding, NewOrganization, Organization};
use orgdir_persistence::DbExecutor;

use crate::config::Config;
use crate::dao::{ActivityDao, BuildingDao, OrganizationDao};
use crate::error::Error;

pub const AREA_REQUIRED: &str = "Specify either radius_km or all four rect params";

#[derive(Clone)]
pub struct Directory {
    db: DbExecutor,
    config: Config,
}

impl Directory {
    pub fn new(db: DbExecutor, config: Config) -> Self {
        Directory { db, config }
    }

    pub fn db(&self) -> &DbExecutor {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn buildings(&self) -> Result<Vec<Building>, Error> {
        Ok(self.db.as_dao::<BuildingDao>().list().await?)
    }

    pub async fn create_building(&self, building: NewBuilding) -> Result<Building, Error> {
        let building = self.db.as_dao::<BuildingDao>().create(building).await?;
        log::info!("Created building [{}] at {}", building.id, building.address);
        Ok(building)
    }

    pub async fn activities(&self) -> Result<Vec<Activity>, Error> {
        Ok(self.db.as_dao::<ActivityDao>().list().await?)
    }

    pub async fn create_activity(&self, activity: NewActivity) -> Result<Activity, Error> {
        let activity = self
            .db
            .as_dao::<ActivityDao>()
            .create(activity, self.config.max_activity_depth)
            .await?;
        log::info!(
            "Created activity [{}] {} at depth {}",
            activity.id,
            activity.name,
            activity.depth
        );
        Ok(activity)
    }

    pub async fn organization(&self, organization_id: i32) -> Result<Organization, Error> {
        self.db
            .as_dao::<OrganizationDao>()
            .get(organization_id)
            .await?
            .ok_or_else(|| Error::NotFound("Organization not found".into()))
    }

    pub async fn create_organization(
        &self,
        organization: NewOrganization,
    ) -> Result<Organization, Error> {
        let organization = self
            .db
            .as_dao::<OrganizationDao>()
            .create(organization)
            .await?;
        log::info!(
            "Created organization [{}] {} with {} phone(s) and {} activity link(s)",
            organization.id,
            organization.name,
            organization.phones.len(),
            organization.activities.len()
        );
        Ok(organization)
    }

    pub async fn organizations_by_building(
        &self,
        building_id: i32,
    ) -> Result<Vec<Organization>, Error> {
        if self.db.as_dao::<BuildingDao>().get(building_id).await?.is_none() {
            return Err(Error::NotFound("Building not found".into()));
        }
        Ok(self
            .db
            .as_dao::<OrganizationDao>()
            .list_by_building_ids(vec![building_id])
            .await?)
    }

    /// Organizations linked to `activity_id` or to any activity nested below it.
    pub async fn organizations_by_activity(
        &self,
        activity_id: i32,
    ) -> Result<Vec<Organization>, Error> {
        let dao = self.db.as_dao::<ActivityDao>();
        if dao.get(activity_id).await?.is_none() {
            return Err(Error::NotFound("Activity not found".into()));
        }

        let ids = dao.collect_descendant_ids(activity_id).await?;
        log::debug!("Activity [{}] expands to {:?}", activity_id, ids);

        Ok(self
            .db
            .as_dao::<OrganizationDao>()
            .list_by_activity_ids(ids.into_iter().collect())
            .await?)
    }

    pub async fn organizations_by_name(
        &self,
        name: Option<&str>,
    ) -> Result<Vec<Organization>, Error> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(Error::Validation(
                    "Query parameter `name` must be at least 1 character long".into(),
                ))
            }
        };
        Ok(self
            .db
            .as_dao::<OrganizationDao>()
            .list_by_name_substring(name)
            .await?)
    }

    pub async fn organizations_nearby(
        &self,
        params: NearbyParams,
    ) -> Result<Vec<Organization>, Error> {
        let area = resolve_area(&params)?;
        let building_ids = self.db.as_dao::<BuildingDao>().ids_in_area(area).await?;
        if building_ids.is_empty() {
            return Ok(vec![]);
        }

        Ok(self
            .db
            .as_dao::<OrganizationDao>()
            .list_by_building_ids(building_ids)
            .await?)
    }
}

/// Picks the geo filter mode from the query parameters.
///
/// `radius_km` selects the circle mode, which then needs both `lat` and `lng`.
/// Without it all four rectangle bounds are required.
pub fn resolve_area(params: &NearbyParams) -> Result<Area, Error> {
    if let Some(radius_km) = params.radius_km {
        if radius_km < 0.0 {
            return Err(Error::BadRequest("radius_km must not be negative".into()));
        }
        return match (params.lat, params.lng) {
            (Some(lat), Some(lng)) => Ok(Area::Circle {
                center: Point::new(lat, lng),
                radius_km,
            }),
            _ => Err(Error::BadRequest(
                "lat and lng are required with radius_km".into(),
            )),
        };
    }

    match (params.min_lat, params.max_lat, params.min_lng, params.max_lng) {
        (Some(min_lat), Some(max_lat), Some(min_lng), Some(max_lng)) => {
            Ok(Area::Rectangle(BoundingBox {
                min_lat,
                max_lat,
                min_lng,
                max_lng,
            }))
        }
        _ => Err(Error::BadRequest(AREA_REQUIRED.into())),
    }
}
