use serde::{Deserialize, Serialize};

/// Node of the activity forest.
///
/// `depth` is 1 for roots and `parent.depth + 1` otherwise. It is fixed at
/// creation since activities are never re-parented.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub depth: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

impl NewActivity {
    pub fn root(name: impl Into<String>) -> Self {
        NewActivity {
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn child(name: impl Into<String>, parent_id: i32) -> Self {
        NewActivity {
            name: name.into(),
            parent_id: Some(parent_id),
        }
    }
}
