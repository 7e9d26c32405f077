use actix_web::Scope;
use std::net::{IpAddr, SocketAddr};
use url::Url;

pub mod extractors;
pub mod middleware;

pub const API_URL_ENV_VAR: &str = "ORGDIR_API_URL";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Socket address the REST API binds to, taken from its public URL.
///
/// Only IP hosts are accepted. A URL without an explicit port binds the
/// default API port.
pub fn rest_api_addr(api_url: &Url) -> anyhow::Result<SocketAddr> {
    let host = api_url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("API URL has no host: {}", api_url))?;
    let ip: IpAddr = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .map_err(|_| anyhow::anyhow!("only IP addresses are supported in API URL: {}", host))?;
    let port = match api_url.port() {
        Some(port) => port,
        None => Url::parse(DEFAULT_API_URL)?.port().unwrap_or(8000),
    };
    Ok(SocketAddr::new(ip, port))
}

/// Lets modules register their routes on a shared scope:
/// `scope.extend(buildings::register_endpoints)`.
pub trait ExtendableScope {
    fn extend<F>(self, f: F) -> Self
    where
        Self: Sized,
        F: FnOnce(Self) -> Self;
}

impl<T> ExtendableScope for Scope<T> {
    #[inline(always)]
    fn extend<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        f(self)
    }
}
