use actix_cors::Cors;
use actix_web::http::header;
use structopt::StructOpt;

use orgdir_model::API_KEY_HEADER;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://127.0.0.1:8000", "http://localhost:8000"];

#[derive(Clone, StructOpt, Debug)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser
    #[structopt(
        long = "api-allow-origin",
        env = "ORGDIR_API_ALLOW_ORIGIN",
        use_delimiter = true,
        default_value = "http://127.0.0.1:8000,http://localhost:8000"
    )]
    pub allowed_origins: Vec<String>,
    /// Maximum time (in seconds) a preflight response may be cached
    #[structopt(long = "api-cors-max-age", default_value = "3600")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            max_age: 3600,
        }
    }
}

impl CorsConfig {
    /// Browsers send preflights without the API key, so this has to wrap
    /// outside of [`ApiKeyAuth`](super::ApiKeyAuth).
    pub fn cors(&self) -> Cors {
        self.allowed_origins.iter().fold(
            Cors::default()
                .allowed_methods(vec!["GET", "POST"])
                .allowed_header(API_KEY_HEADER)
                .allowed_header(header::CONTENT_TYPE)
                .max_age(self.max_age),
            |cors, origin| cors.allowed_origin(origin),
        )
    }
}
