use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use serde_derive::{Deserialize, Serialize};

use crate::{errors::ServerError, schema::tags};

#[derive(Clone, Debug, PartialEq, Queryable, Insertable, Serialize)]
#[diesel(table_name = tags)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TagInput {
    pub name: Option<String>,
}

impl TagInput {
    pub fn validate(self) -> Result<String, ServerError> {
        self.name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .ok_or(ServerError::MissingField("name"))
    }
}
