use serde::{Deserialize, Serialize};

use crate::{Activity, Building};

/// Organization with its phones, building and activities resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i32,
    pub name: String,
    pub phones: Vec<String>,
    pub building: Building,
    pub activities: Vec<Activity>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    pub building_id: i32,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub activity_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_organization_lists_default_to_empty() {
        let org: NewOrganization =
            serde_json::from_str(r#"{"name": "Pizza Place", "building_id": 3}"#).unwrap();
        assert_eq!(
            org,
            NewOrganization {
                name: "Pizza Place".into(),
                building_id: 3,
                phones: vec![],
                activity_ids: vec![],
            }
        );
    }

    #[test]
    fn organization_embeds_building_and_activities() {
        let org = Organization {
            id: 1,
            name: "Dairy".into(),
            phones: vec!["2-222-222".into()],
            building: Building {
                id: 2,
                address: "Lenina 1".into(),
                latitude: 55.75,
                longitude: 37.61,
            },
            activities: vec![Activity {
                id: 5,
                name: "Milk".into(),
                parent_id: Some(4),
                depth: 2,
            }],
        };

        let json = serde_json::to_value(&org).unwrap();
        assert_eq!(json["phones"][0], "2-222-222");
        assert_eq!(json["building"]["latitude"], 55.75);
        assert_eq!(json["activities"][0]["parent_id"], 4);
    }
}
