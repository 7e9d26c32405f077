//! Organization directory catalog: buildings, the activity taxonomy and the
//! organizations linking them, with their storage, queries and REST endpoints.

#[macro_use]
extern crate diesel;

use actix_web::Scope;

use orgdir_persistence::DbExecutor;

pub mod api;
pub mod config;
pub mod dao;
pub mod db;
pub mod directory;
pub mod error;
pub mod seed;
pub mod tree;

pub use config::Config;
pub use directory::Directory;
pub use error::Error;

pub struct CatalogService;

impl CatalogService {
    /// Brings the catalog schema up to date.
    pub fn apply_migrations(executor: &DbExecutor) -> Result<(), db::DbError> {
        executor.apply_migration(db::migrations::run_with_output)
    }

    pub fn rest(directory: &Directory) -> Scope {
        api::web_scope(directory)
    }
}
