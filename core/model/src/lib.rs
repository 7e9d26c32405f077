//! JSON bodies and query parameters of the directory REST API.

use serde::{Deserialize, Serialize};

pub mod activity;
pub mod building;
pub mod organization;
pub mod params;

pub use activity::{Activity, NewActivity};
pub use building::{Building, NewBuilding};
pub use organization::{NewOrganization, Organization};

/// HTTP header carrying the shared API secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Body of every error response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: Option<String>,
}

impl ErrorMessage {
    pub fn new(message: impl ToString) -> Self {
        ErrorMessage {
            message: Some(message.to_string()),
        }
    }
}
