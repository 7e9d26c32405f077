use diesel::prelude::*;
use std::collections::{BTreeSet, HashMap};

use orgdir_model::{Activity, Building, NewOrganization, Organization};
use orgdir_persistence::{do_with_transaction, readonly_transaction, AsDao, ConnType, PoolType};

use crate::dao::activity::count_existing;
use crate::dao::last_insert_rowid;
use crate::db::model::{DbActivity, DbBuilding, DbOrgActivityLink, DbOrganization, DbPhone, NewDbPhone};
use crate::db::schema::{activities, buildings, org_activity_link, organizations, phones};
use crate::db::DbResult;
use crate::error::Error;

pub struct OrganizationDao<'c> {
    pool: &'c PoolType,
}

impl<'c> AsDao<'c> for OrganizationDao<'c> {
    fn as_dao(pool: &'c PoolType) -> Self {
        Self { pool }
    }
}

impl<'c> OrganizationDao<'c> {
    pub async fn get(&self, organization_id: i32) -> DbResult<Option<Organization>> {
        readonly_transaction(self.pool, "organization_dao_get", move |conn| {
            let organization = organizations::table
                .find(organization_id)
                .first::<DbOrganization>(conn)
                .optional()?;

            match organization {
                Some(organization) => Ok(hydrate(conn, vec![organization])?.pop()),
                None => Ok(None),
            }
        })
        .await
    }

    /// Inserts the organization with its phones and activity links.
    ///
    /// Fails with `NotFound` for an unknown building and with `BadRequest` when
    /// the activity ids do not resolve one-to-one to existing activities
    /// (unknown or repeated ids). Nothing is written in either case.
    pub async fn create(&self, organization: NewOrganization) -> Result<Organization, Error> {
        do_with_transaction(self.pool, "organization_dao_create", move |conn| {
            let building = buildings::table
                .find(organization.building_id)
                .select(buildings::id)
                .first::<i32>(conn)
                .optional()?;
            if building.is_none() {
                return Err(Error::NotFound("Building not found".into()));
            }

            let activity_ids = &organization.activity_ids;
            if count_existing(conn, activity_ids)? < activity_ids.len() {
                return Err(Error::BadRequest("Some activity_ids not found".into()));
            }

            diesel::insert_into(organizations::table)
                .values((
                    organizations::name.eq(&organization.name),
                    organizations::building_id.eq(organization.building_id),
                ))
                .execute(conn)?;
            let id: i32 = diesel::select(last_insert_rowid).first(conn)?;

            let new_phones = organization
                .phones
                .iter()
                .map(|number| NewDbPhone {
                    organization_id: id,
                    number,
                })
                .collect::<Vec<_>>();
            if !new_phones.is_empty() {
                // batch inserts are only implemented for the bare SQLite connection
                diesel::insert_into(phones::table)
                    .values(&new_phones)
                    .execute(&**conn)?;
            }
            link_activities(conn, id, activity_ids)?;

            let created = organizations::table.find(id).first::<DbOrganization>(conn)?;
            hydrate(conn, vec![created])?
                .pop()
                .ok_or_else(|| diesel::result::Error::NotFound.into())
        })
        .await
    }

    pub async fn list_by_building_ids(&self, building_ids: Vec<i32>) -> DbResult<Vec<Organization>> {
        readonly_transaction(self.pool, "organization_dao_list_by_building_ids", move |conn| {
            if building_ids.is_empty() {
                return Ok(vec![]);
            }
            let found = organizations::table
                .filter(organizations::building_id.eq_any(&building_ids))
                .order(organizations::id.asc())
                .load::<DbOrganization>(conn)?;
            hydrate(conn, found)
        })
        .await
    }

    /// Organizations linked to at least one of `activity_ids`, each listed once.
    pub async fn list_by_activity_ids(&self, activity_ids: Vec<i32>) -> DbResult<Vec<Organization>> {
        readonly_transaction(self.pool, "organization_dao_list_by_activity_ids", move |conn| {
            if activity_ids.is_empty() {
                return Ok(vec![]);
            }
            let organization_ids = org_activity_link::table
                .select(org_activity_link::organization_id)
                .filter(org_activity_link::activity_id.eq_any(&activity_ids))
                .distinct()
                .load::<i32>(conn)?;

            let found = organizations::table
                .filter(organizations::id.eq_any(&organization_ids))
                .order(organizations::id.asc())
                .load::<DbOrganization>(conn)?;
            hydrate(conn, found)
        })
        .await
    }

    /// Case-insensitive substring match on the organization name.
    ///
    /// Matching happens here rather than with SQLite `LIKE`, which only folds
    /// ASCII letters.
    pub async fn list_by_name_substring(&self, text: &str) -> DbResult<Vec<Organization>> {
        let needle = text.to_lowercase();

        readonly_transaction(self.pool, "organization_dao_list_by_name_substring", move |conn| {
            let found = organizations::table
                .order(organizations::id.asc())
                .load::<DbOrganization>(conn)?
                .into_iter()
                .filter(|organization| organization.name.to_lowercase().contains(&needle))
                .collect();
            hydrate(conn, found)
        })
        .await
    }

    /// Links the organization with every activity in `activity_ids`.
    ///
    /// Already linked pairs are skipped. Returns the number of new links.
    pub async fn attach_activities(&self, organization_id: i32, activity_ids: Vec<i32>) -> DbResult<usize> {
        do_with_transaction(self.pool, "organization_dao_attach_activities", move |conn| {
            link_activities(conn, organization_id, &dedup(&activity_ids))
        })
        .await
    }

    /// Removes links to `activity_ids`. Returns the number of removed links.
    pub async fn detach_activities(&self, organization_id: i32, activity_ids: Vec<i32>) -> DbResult<usize> {
        do_with_transaction(self.pool, "organization_dao_detach_activities", move |conn| {
            Ok(diesel::delete(
                org_activity_link::table
                    .filter(org_activity_link::organization_id.eq(organization_id))
                    .filter(org_activity_link::activity_id.eq_any(&activity_ids)),
            )
            .execute(conn)?)
        })
        .await
    }

    /// Deletes the organization; its phones and activity links go with it.
    pub async fn delete(&self, organization_id: i32) -> DbResult<bool> {
        do_with_transaction(self.pool, "organization_dao_delete", move |conn| {
            let deleted = diesel::delete(organizations::table.find(organization_id)).execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }
}

fn dedup(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

fn link_activities(conn: &ConnType, organization_id: i32, activity_ids: &[i32]) -> DbResult<usize> {
    if activity_ids.is_empty() {
        return Ok(0);
    }
    let linked = org_activity_link::table
        .select(org_activity_link::activity_id)
        .filter(org_activity_link::organization_id.eq(organization_id))
        .filter(org_activity_link::activity_id.eq_any(activity_ids))
        .load::<i32>(conn)?;

    let links = activity_ids
        .iter()
        .filter(|activity_id| !linked.contains(activity_id))
        .map(|&activity_id| DbOrgActivityLink {
            organization_id,
            activity_id,
        })
        .collect::<Vec<_>>();
    if links.is_empty() {
        return Ok(0);
    }

    Ok(diesel::insert_into(org_activity_link::table)
        .values(&links)
        .execute(&**conn)?)
}

/// Resolves phones, building and activities of `found` with one query per
/// relation, keeping the order of `found`.
fn hydrate(conn: &ConnType, found: Vec<DbOrganization>) -> DbResult<Vec<Organization>> {
    if found.is_empty() {
        return Ok(vec![]);
    }

    let phones_by_org = DbPhone::belonging_to(&found)
        .order(phones::id.asc())
        .load::<DbPhone>(conn)?
        .grouped_by(&found);

    let building_ids = found.iter().map(|org| org.building_id).collect::<Vec<_>>();
    let buildings_by_id = buildings::table
        .filter(buildings::id.eq_any(&building_ids))
        .load::<DbBuilding>(conn)?
        .into_iter()
        .map(|building| (building.id, Building::from(building)))
        .collect::<HashMap<_, _>>();

    let organization_ids = found.iter().map(|org| org.id).collect::<Vec<_>>();
    let mut activities_by_org: HashMap<i32, Vec<Activity>> = HashMap::new();
    for (organization_id, activity) in org_activity_link::table
        .inner_join(activities::table)
        .filter(org_activity_link::organization_id.eq_any(&organization_ids))
        .select((org_activity_link::organization_id, activities::all_columns))
        .order(activities::id.asc())
        .load::<(i32, DbActivity)>(conn)?
    {
        activities_by_org
            .entry(organization_id)
            .or_default()
            .push(activity.into());
    }

    found
        .into_iter()
        .zip(phones_by_org)
        .map(|(organization, phones)| -> DbResult<Organization> {
            let building = buildings_by_id
                .get(&organization.building_id)
                .cloned()
                .ok_or(diesel::result::Error::NotFound)?;

            Ok(Organization {
                id: organization.id,
                name: organization.name,
                phones: phones.into_iter().map(|phone| phone.number).collect(),
                building,
                activities: activities_by_org
                    .remove(&organization.id)
                    .unwrap_or_default(),
            })
        })
        .collect()
}
