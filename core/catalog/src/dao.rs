mod activity;
mod building;
mod organization;

pub use activity::ActivityDao;
pub use building::BuildingDao;
pub use organization::OrganizationDao;

no_arg_sql_function!(last_insert_rowid, diesel::sql_types::Integer);
