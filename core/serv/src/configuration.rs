use anyhow::Context;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use orgdir_persistence::DbExecutor;

pub const APP_NAME: &str = "orgdir";
const DB_NAME: &str = "orgdir";

/// Directory holding the catalog database when no `DATABASE_URL` is given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDir(PathBuf);

impl DataDir {
    pub fn platform_default() -> Self {
        DataDir(
            directories::ProjectDirs::from("", "", APP_NAME)
                .map(|dirs| dirs.data_dir().into())
                .unwrap_or_else(|| PathBuf::from(APP_NAME)),
        )
    }

    pub fn get_or_create(&self) -> anyhow::Result<&Path> {
        if !self.0.exists() {
            log::info!("Creating data dir: {}", self.0.display());
            std::fs::create_dir_all(&self.0)
                .with_context(|| format!("data dir {} creation error", self.0.display()))?;
        }
        Ok(&self.0)
    }
}

impl FromStr for DataDir {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DataDir(PathBuf::from(s.trim_matches('"'))))
    }
}

/// Opens the catalog database: `database_url` when given, otherwise
/// `orgdir.db` inside the data dir.
pub fn open_db(data_dir: Option<&DataDir>, database_url: Option<&str>) -> anyhow::Result<DbExecutor> {
    let db = match database_url {
        Some(url) => DbExecutor::new(url)?,
        None => {
            let data_dir = match data_dir {
                Some(dir) => dir.clone(),
                None => DataDir::platform_default(),
            };
            DbExecutor::from_data_dir(data_dir.get_or_create()?, DB_NAME)?
        }
    };
    Ok(db)
}
