use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable};
use serde_derive::{Deserialize, Serialize};

use crate::{
    errors::ServerError,
    schema::notes,
    utils::{non_empty, parse_id},
};

#[derive(Clone, Debug, PartialEq, Queryable, Insertable)]
#[diesel(table_name = notes)]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the client-writable fields of a note.
#[derive(Clone, Debug, AsChangeset)]
#[diesel(table_name = notes, treat_none_as_null = true)]
pub struct NoteChanges {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<String>,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /notes` and `PUT /notes/{id}`. Anything else in the body,
/// an owner field included, is ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<String>,
    pub tags: Vec<String>,
}

impl NoteInput {
    pub fn validate(self) -> Result<NoteDraft, ServerError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ServerError::MissingField("title"))?;

        let folder_id = non_empty(self.folder_id)
            .map(|id| parse_id(&id).ok_or(ServerError::InvalidIdentifier("folderId")))
            .transpose()?;

        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags.unwrap_or_default() {
            let tag = parse_id(&tag).ok_or(ServerError::InvalidIdentifier("tags"))?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Ok(NoteDraft {
            title,
            content: self.content,
            folder_id,
            tags,
        })
    }
}

impl NoteDraft {
    pub fn into_note(self, user_id: &str, id: String, now: DateTime<Utc>) -> Note {
        Note {
            id,
            user_id: user_id.to_owned(),
            title: self.title,
            content: self.content,
            folder_id: self.folder_id,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_changes(self, now: DateTime<Utc>) -> NoteChanges {
        NoteChanges {
            title: self.title,
            content: self.content,
            folder_id: self.folder_id,
            tags: self.tags,
            updated_at: now,
        }
    }
}

/// The shaped note returned to clients.
///
/// `folder_id` is doubly optional: `Some(None)` serializes as `"folderId": null`
/// while `None` drops the key. Create responses drop it when the note has no
/// folder; every other response always carries it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Option<String>>,
    pub tags: Vec<String>,
}

impl NoteResponse {
    pub fn created(note: Note) -> Self {
        let mut shaped = NoteResponse::from(note);
        if shaped.folder_id == Some(None) {
            shaped.folder_id = None;
        }
        shaped
    }
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        NoteResponse {
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
            folder_id: Some(note.folder_id),
            tags: note.tags,
        }
    }
}
