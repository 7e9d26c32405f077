pub(crate) mod model;
pub(crate) mod schema;

pub mod migrations {
    #[derive(diesel_migrations::EmbedMigrations)]
    struct _Dummy;
}

pub use orgdir_persistence::Error as DbError;

pub type DbResult<T> = Result<T, DbError>;
