use diesel::prelude::*;

use orgdir_geo::Area;
use orgdir_model::{Building, NewBuilding};
use orgdir_persistence::{do_with_transaction, readonly_transaction, AsDao, PoolType};

use crate::dao::last_insert_rowid;
use crate::db::model::DbBuilding;
use crate::db::schema::buildings::dsl;
use crate::db::DbResult;

pub struct BuildingDao<'c> {
    pool: &'c PoolType,
}

impl<'c> AsDao<'c> for BuildingDao<'c> {
    fn as_dao(pool: &'c PoolType) -> Self {
        Self { pool }
    }
}

impl<'c> BuildingDao<'c> {
    pub async fn get(&self, building_id: i32) -> DbResult<Option<Building>> {
        readonly_transaction(self.pool, "building_dao_get", move |conn| {
            Ok(dsl::buildings
                .find(building_id)
                .first::<DbBuilding>(conn)
                .optional()?
                .map(Into::into))
        })
        .await
    }

    pub async fn list(&self) -> DbResult<Vec<Building>> {
        readonly_transaction(self.pool, "building_dao_list", |conn| {
            Ok(dsl::buildings
                .order(dsl::id.asc())
                .load::<DbBuilding>(conn)?
                .into_iter()
                .map(Into::into)
                .collect())
        })
        .await
    }

    pub async fn create(&self, building: NewBuilding) -> DbResult<Building> {
        do_with_transaction(self.pool, "building_dao_create", move |conn| {
            diesel::insert_into(dsl::buildings)
                .values((
                    dsl::address.eq(&building.address),
                    dsl::latitude.eq(building.latitude),
                    dsl::longitude.eq(building.longitude),
                ))
                .execute(conn)?;
            let id: i32 = diesel::select(last_insert_rowid).first(conn)?;

            Ok(Building {
                id,
                address: building.address,
                latitude: building.latitude,
                longitude: building.longitude,
            })
        })
        .await
    }

    pub async fn is_empty(&self) -> DbResult<bool> {
        readonly_transaction(self.pool, "building_dao_is_empty", |conn| {
            Ok(dsl::buildings
                .select(dsl::id)
                .first::<i32>(conn)
                .optional()?
                .is_none())
        })
        .await
    }

    /// Ids of buildings located in `area`, by a full scan.
    pub async fn ids_in_area(&self, area: Area) -> DbResult<Vec<i32>> {
        readonly_transaction(self.pool, "building_dao_ids_in_area", move |conn| {
            let buildings = dsl::buildings
                .order(dsl::id.asc())
                .load::<DbBuilding>(conn)?;
            let scanned = buildings.len();

            let ids = buildings
                .into_iter()
                .filter(|building| area.contains(&building.location()))
                .map(|building| building.id)
                .collect::<Vec<_>>();

            log::debug!("{} of {} buildings in {:?}", ids.len(), scanned, area);
            Ok(ids)
        })
        .await
    }
}
