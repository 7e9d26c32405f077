use diesel::prelude::*;
use std::collections::BTreeSet;

use orgdir_model::{Activity, NewActivity};
use orgdir_persistence::{do_with_transaction, readonly_transaction, AsDao, ConnType, PoolType};

use crate::dao::last_insert_rowid;
use crate::db::model::DbActivity;
use crate::db::schema::activities::dsl;
use crate::db::DbResult;
use crate::error::Error;
use crate::tree;

pub struct ActivityDao<'c> {
    pool: &'c PoolType,
}

impl<'c> AsDao<'c> for ActivityDao<'c> {
    fn as_dao(pool: &'c PoolType) -> Self {
        Self { pool }
    }
}

impl<'c> ActivityDao<'c> {
    pub async fn get(&self, activity_id: i32) -> DbResult<Option<Activity>> {
        readonly_transaction(self.pool, "activity_dao_get", move |conn| {
            Ok(dsl::activities
                .find(activity_id)
                .first::<DbActivity>(conn)
                .optional()?
                .map(Into::into))
        })
        .await
    }

    pub async fn list(&self) -> DbResult<Vec<Activity>> {
        readonly_transaction(self.pool, "activity_dao_list", |conn| {
            Ok(dsl::activities
                .order(dsl::id.asc())
                .load::<DbActivity>(conn)?
                .into_iter()
                .map(Into::into)
                .collect())
        })
        .await
    }

    /// Inserts a node under `activity.parent_id`.
    ///
    /// Parent lookup, depth check and insert share one write transaction, so
    /// a rejected node leaves no row behind.
    pub async fn create(&self, activity: NewActivity, max_depth: u32) -> Result<Activity, Error> {
        do_with_transaction(self.pool, "activity_dao_create", move |conn| {
            let parent_depth = match activity.parent_id {
                Some(parent_id) => dsl::activities
                    .find(parent_id)
                    .select(dsl::depth)
                    .first::<i32>(conn)
                    .optional()?,
                None => None,
            };
            let depth = tree::depth_for(activity.parent_id, parent_depth, max_depth)?;

            diesel::insert_into(dsl::activities)
                .values((
                    dsl::name.eq(&activity.name),
                    dsl::parent_id.eq(activity.parent_id),
                    dsl::depth.eq(depth),
                ))
                .execute(conn)?;
            let id: i32 = diesel::select(last_insert_rowid).first(conn)?;

            Ok(Activity {
                id,
                name: activity.name,
                parent_id: activity.parent_id,
                depth,
            })
        })
        .await
    }

    pub async fn children_of(&self, activity_id: i32) -> DbResult<Vec<i32>> {
        readonly_transaction(self.pool, "activity_dao_children_of", move |conn| {
            children_of(conn, activity_id)
        })
        .await
    }

    /// `activity_id` and all activities nested below it, at any level.
    pub async fn collect_descendant_ids(&self, activity_id: i32) -> DbResult<BTreeSet<i32>> {
        readonly_transaction(self.pool, "activity_dao_collect_descendant_ids", move |conn| {
            tree::collect_descendants(activity_id, |id| children_of(conn, id))
        })
        .await
    }

    /// How many of `activity_ids` exist. Duplicates are counted once.
    pub async fn count_existing(&self, activity_ids: Vec<i32>) -> DbResult<usize> {
        readonly_transaction(self.pool, "activity_dao_count_existing", move |conn| {
            count_existing(conn, &activity_ids)
        })
        .await
    }
}

fn children_of(conn: &ConnType, activity_id: i32) -> DbResult<Vec<i32>> {
    Ok(dsl::activities
        .select(dsl::id)
        .filter(dsl::parent_id.eq(activity_id))
        .order(dsl::id.asc())
        .load(conn)?)
}

pub(crate) fn count_existing(conn: &ConnType, activity_ids: &[i32]) -> DbResult<usize> {
    if activity_ids.is_empty() {
        return Ok(0);
    }
    let count: i64 = dsl::activities
        .filter(dsl::id.eq_any(activity_ids))
        .count()
        .get_result(conn)?;
    Ok(count as usize)
}
