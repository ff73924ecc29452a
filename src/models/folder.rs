use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use serde_derive::{Deserialize, Serialize};

use crate::{errors::ServerError, schema::folders};

#[derive(Clone, Debug, PartialEq, Queryable, Insertable, Serialize)]
#[diesel(table_name = folders)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FolderInput {
    pub name: Option<String>,
}

impl FolderInput {
    pub fn validate(self) -> Result<String, ServerError> {
        self.name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .ok_or(ServerError::MissingField("name"))
    }
}
