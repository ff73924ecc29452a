use chrono::{DateTime, Utc};
use derive_more::Display;

use crate::{
    filter::NoteFilter,
    models::{
        folder::Folder,
        note::{Note, NoteChanges},
        tag::Tag,
        user::User,
    },
};

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[derive(Debug, Display)]
pub enum StoreError {
    NotFound,
    /// A uniqueness constraint was violated.
    Conflict,
    /// A folder or tag reference does not belong to the note's owner.
    #[display(fmt = "invalid reference in {}", _0)]
    InvalidReference(&'static str),
    #[display(fmt = "backend error: {}", _0)]
    Backend(String),
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> StoreError {
        StoreError::Backend(e.to_string())
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> StoreError {
        match e {
            diesel::result::Error::NotFound => StoreError::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => StoreError::Conflict,
            e => StoreError::Backend(e.to_string()),
        }
    }
}

/// Every note read goes through a [`NoteFilter`], writes are keyed by owner
/// and id.
pub trait NoteRepository {
    fn find_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError>;
    fn find_note(&self, filter: &NoteFilter) -> Result<Option<Note>, StoreError>;
    fn count_notes(&self, filter: &NoteFilter) -> Result<i64, StoreError>;
    fn insert_note(&self, note: Note) -> Result<Note, StoreError>;
    /// Returns `None` when the owner has no note with this id.
    fn update_note(
        &self,
        user_id: &str,
        id: &str,
        changes: NoteChanges,
    ) -> Result<Option<Note>, StoreError>;
    /// Returns how many notes were removed, zero included.
    fn delete_note(&self, user_id: &str, id: &str) -> Result<usize, StoreError>;
}

pub trait FolderRepository {
    fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, StoreError>;
    fn find_folder(&self, user_id: &str, id: &str) -> Result<Option<Folder>, StoreError>;
    fn insert_folder(&self, folder: Folder) -> Result<Folder, StoreError>;
    fn rename_folder(
        &self,
        user_id: &str,
        id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Folder>, StoreError>;
    /// Also detaches the folder from the owner's notes.
    fn delete_folder(&self, user_id: &str, id: &str) -> Result<usize, StoreError>;
}

pub trait TagRepository {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>, StoreError>;
    fn find_tag(&self, user_id: &str, id: &str) -> Result<Option<Tag>, StoreError>;
    fn insert_tag(&self, tag: Tag) -> Result<Tag, StoreError>;
    fn rename_tag(
        &self,
        user_id: &str,
        id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Tag>, StoreError>;
    /// Also removes the tag from the owner's notes.
    fn delete_tag(&self, user_id: &str, id: &str) -> Result<usize, StoreError>;
}

pub trait UserRepository {
    fn insert_user(&self, user: User) -> Result<User, StoreError>;
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

pub trait Store:
    NoteRepository + FolderRepository + TagRepository + UserRepository + Send + Sync
{
}

impl<T> Store for T where
    T: NoteRepository + FolderRepository + TagRepository + UserRepository + Send + Sync
{
}
