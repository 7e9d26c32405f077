use anyhow::Result;
use std::path::PathBuf;
use structopt::{clap, StructOpt};
use url::Url;

use orgdir_catalog::seed::seed;
use orgdir_catalog::{CatalogService, Directory};
use orgdir_file_logging::{start_logger, DEFAULT_MODULE_OVERRIDES};
use orgdir_persistence::DbExecutor;
use orgdir_service_api_web::middleware::CorsConfig;
use orgdir_service_api_web::rest_api_addr;

mod autocomplete;
mod configuration;
mod server;

use autocomplete::CompleteCommand;
use configuration::{open_db, DataDir};
use server::{create_server, CreateServerArgs};

#[derive(StructOpt, Debug)]
#[structopt(global_setting = clap::AppSettings::ColoredHelp)]
#[structopt(about = clap::crate_description!())]
#[structopt(setting = clap::AppSettings::DeriveDisplayOrder)]
struct CliArgs {
    /// Service data dir
    #[structopt(short, long = "datadir", env = "ORGDIR_DATADIR")]
    #[structopt(set = clap::ArgSettings::Global)]
    data_dir: Option<DataDir>,

    /// Database location, takes precedence over the data dir
    #[structopt(long, env = "DATABASE_URL")]
    #[structopt(set = clap::ArgSettings::Global)]
    database_url: Option<String>,

    /// Also write logs to rotated files in this directory
    #[structopt(long, env = "ORGDIR_LOG_DIR")]
    #[structopt(set = clap::ArgSettings::Global)]
    log_dir: Option<PathBuf>,

    /// Log at debug level
    #[structopt(long)]
    #[structopt(set = clap::ArgSettings::Global)]
    debug: bool,

    #[structopt(flatten)]
    catalog: orgdir_catalog::Config,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Core service usage
    #[structopt(setting = clap::AppSettings::DeriveDisplayOrder)]
    Service(ServiceCommand),

    /// Database maintenance
    #[structopt(setting = clap::AppSettings::DeriveDisplayOrder)]
    Db(DbCommand),

    #[structopt(name = "complete")]
    #[structopt(setting = clap::AppSettings::Hidden)]
    Complete(CompleteCommand),
}

#[derive(StructOpt, Debug)]
enum ServiceCommand {
    /// Runs server in foreground
    Run(ServiceCommandOpts),
}

#[derive(StructOpt, Debug)]
struct ServiceCommandOpts {
    /// Service address
    #[structopt(long, env = "ORGDIR_API_URL", default_value = "http://127.0.0.1:8000")]
    api_url: Url,

    /// Secret expected in the X-API-Key header of every request
    #[structopt(long, env = "ORGDIR_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Do not load demo data into an empty database [env: ORGDIR_NO_SEED]
    #[structopt(long)]
    no_seed: bool,

    #[structopt(flatten)]
    cors: CorsConfig,
}

const NO_SEED_ENV_VAR: &str = "ORGDIR_NO_SEED";

impl ServiceCommandOpts {
    fn skip_seed(&self) -> bool {
        self.no_seed || env_flag(std::env::var(NO_SEED_ENV_VAR).ok().as_deref())
    }
}

/// Set unless empty, `0` or `false`.
fn env_flag(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !(v.is_empty() || v == "0" || v == "false"),
    }
}

#[derive(StructOpt, Debug)]
enum DbCommand {
    /// Applies pending migrations
    Migrate,
    /// Applies pending migrations and loads demo data into an empty database
    Seed,
}

impl CliArgs {
    fn open_db(&self) -> Result<DbExecutor> {
        let db = open_db(self.data_dir.as_ref(), self.database_url.as_deref())?;
        CatalogService::apply_migrations(&db)?;
        Ok(db)
    }

    async fn run_command(self) -> Result<()> {
        match &self.command {
            Command::Service(ServiceCommand::Run(opts)) => self.run_service(opts).await,
            Command::Db(DbCommand::Migrate) => {
                self.open_db()?;
                log::info!("Database is up to date");
                Ok(())
            }
            Command::Db(DbCommand::Seed) => {
                let directory = Directory::new(self.open_db()?, self.catalog.clone());
                seed(&directory).await?;
                Ok(())
            }
            Command::Complete(complete) => complete.run_command(),
        }
    }

    async fn run_service(&self, opts: &ServiceCommandOpts) -> Result<()> {
        if opts.api_key.is_empty() {
            anyhow::bail!("API key must not be empty");
        }
        let address = rest_api_addr(&opts.api_url)?;

        log::info!(
            "Starting {} service, max activity depth {}",
            clap::crate_name!(),
            self.catalog.max_activity_depth
        );
        let directory = Directory::new(self.open_db()?, self.catalog.clone());
        if !opts.skip_seed() {
            seed(&directory).await?;
        }

        create_server(CreateServerArgs {
            directory,
            api_key: opts.api_key.clone(),
            cors: opts.cors.clone(),
            address,
        })?
        .await?;

        log::info!("{} service successfully finished!", clap::crate_name!());
        Ok(())
    }
}

#[actix_rt::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = CliArgs::from_args();

    if let Command::Complete(complete) = &args.command {
        return complete.run_command();
    }

    let _logger = start_logger(
        "info",
        args.log_dir.as_deref(),
        DEFAULT_MODULE_OVERRIDES,
        args.debug,
    )?;
    args.run_command().await
}
