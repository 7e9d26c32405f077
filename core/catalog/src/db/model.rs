use orgdir_geo::Point;
use orgdir_model::{Activity, Building};

use crate::db::schema::{activities, buildings, org_activity_link, organizations, phones};

#[derive(Clone, Debug, Identifiable, Queryable)]
#[table_name = "buildings"]
pub struct DbBuilding {
    pub id: i32,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl DbBuilding {
    pub fn location(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }
}

impl From<DbBuilding> for Building {
    fn from(building: DbBuilding) -> Self {
        Building {
            id: building.id,
            address: building.address,
            latitude: building.latitude,
            longitude: building.longitude,
        }
    }
}

#[derive(Clone, Debug, Identifiable, Queryable)]
#[table_name = "activities"]
pub struct DbActivity {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub depth: i32,
}

impl From<DbActivity> for Activity {
    fn from(activity: DbActivity) -> Self {
        Activity {
            id: activity.id,
            name: activity.name,
            parent_id: activity.parent_id,
            depth: activity.depth,
        }
    }
}

#[derive(Clone, Debug, Identifiable, Queryable)]
#[table_name = "organizations"]
pub struct DbOrganization {
    pub id: i32,
    pub name: String,
    pub building_id: i32,
}

#[derive(Clone, Debug, Identifiable, Queryable, Associations)]
#[belongs_to(DbOrganization, foreign_key = "organization_id")]
#[table_name = "phones"]
pub struct DbPhone {
    pub id: i32,
    pub organization_id: i32,
    pub number: String,
}

#[derive(Debug, Insertable)]
#[table_name = "phones"]
pub struct NewDbPhone<'a> {
    pub organization_id: i32,
    pub number: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Queryable, Insertable)]
#[table_name = "org_activity_link"]
pub struct DbOrgActivityLink {
    pub organization_id: i32,
    pub activity_id: i32,
}
