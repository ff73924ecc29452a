use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{FolderRepository, NoteRepository, StoreError, TagRepository, UserRepository};
use crate::{
    filter::NoteFilter,
    models::{
        folder::Folder,
        note::{Note, NoteChanges},
        tag::Tag,
        user::User,
    },
};

/// Process-local store with the same semantics as [`super::PgStore`].
/// Used when no database is configured and by the test suite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    folders: Vec<Folder>,
    tags: Vec<Tag>,
    notes: Vec<Note>,
}

impl Tables {
    fn check_references(
        &self,
        user_id: &str,
        folder_id: Option<&str>,
        tags: &[String],
    ) -> Result<(), StoreError> {
        if let Some(folder_id) = folder_id {
            if !self
                .folders
                .iter()
                .any(|f| f.id == folder_id && f.user_id == user_id)
            {
                return Err(StoreError::InvalidReference("folderId"));
            }
        }
        let owned = |id: &String| self.tags.iter().any(|t| &t.id == id && t.user_id == user_id);
        if !tags.iter().all(owned) {
            return Err(StoreError::InvalidReference("tags"));
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

impl NoteRepository for MemoryStore {
    fn find_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError> {
        let tables = self.tables()?;
        let mut found: Vec<Note> = tables
            .notes
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(found)
    }

    fn find_note(&self, filter: &NoteFilter) -> Result<Option<Note>, StoreError> {
        Ok(self.find_notes(filter)?.into_iter().next())
    }

    fn count_notes(&self, filter: &NoteFilter) -> Result<i64, StoreError> {
        let tables = self.tables()?;
        Ok(tables.notes.iter().filter(|n| filter.matches(n)).count() as i64)
    }

    fn insert_note(&self, note: Note) -> Result<Note, StoreError> {
        let mut tables = self.tables()?;
        if tables.notes.iter().any(|n| n.id == note.id) {
            return Err(StoreError::Conflict);
        }
        tables.check_references(&note.user_id, note.folder_id.as_deref(), &note.tags)?;
        tables.notes.push(note.clone());
        Ok(note)
    }

    fn update_note(
        &self,
        user_id: &str,
        id: &str,
        changes: NoteChanges,
    ) -> Result<Option<Note>, StoreError> {
        let mut tables = self.tables()?;
        let Some(index) = tables
            .notes
            .iter()
            .position(|n| n.id == id && n.user_id == user_id)
        else {
            return Ok(None);
        };
        tables.check_references(user_id, changes.folder_id.as_deref(), &changes.tags)?;

        let note = &mut tables.notes[index];
        note.title = changes.title;
        note.content = changes.content;
        note.folder_id = changes.folder_id;
        note.tags = changes.tags;
        note.updated_at = changes.updated_at;
        Ok(Some(note.clone()))
    }

    fn delete_note(&self, user_id: &str, id: &str) -> Result<usize, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.notes.len();
        tables.notes.retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(before - tables.notes.len())
    }
}

impl FolderRepository for MemoryStore {
    fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, StoreError> {
        let tables = self.tables()?;
        let mut found: Vec<Folder> = tables
            .folders
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn find_folder(&self, user_id: &str, id: &str) -> Result<Option<Folder>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .folders
            .iter()
            .find(|f| f.id == id && f.user_id == user_id)
            .cloned())
    }

    fn insert_folder(&self, folder: Folder) -> Result<Folder, StoreError> {
        let mut tables = self.tables()?;
        if tables
            .folders
            .iter()
            .any(|f| f.id == folder.id || (f.user_id == folder.user_id && f.name == folder.name))
        {
            return Err(StoreError::Conflict);
        }
        tables.folders.push(folder.clone());
        Ok(folder)
    }

    fn rename_folder(
        &self,
        user_id: &str,
        id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Folder>, StoreError> {
        let mut tables = self.tables()?;
        let Some(index) = tables
            .folders
            .iter()
            .position(|f| f.id == id && f.user_id == user_id)
        else {
            return Ok(None);
        };
        if tables
            .folders
            .iter()
            .any(|f| f.id != id && f.user_id == user_id && f.name == name)
        {
            return Err(StoreError::Conflict);
        }

        let folder = &mut tables.folders[index];
        folder.name = name.to_owned();
        folder.updated_at = now;
        Ok(Some(folder.clone()))
    }

    fn delete_folder(&self, user_id: &str, id: &str) -> Result<usize, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.folders.len();
        tables.folders.retain(|f| !(f.id == id && f.user_id == user_id));
        let deleted = before - tables.folders.len();
        if deleted > 0 {
            for note in tables.notes.iter_mut().filter(|n| n.user_id == user_id) {
                if note.folder_id.as_deref() == Some(id) {
                    note.folder_id = None;
                }
            }
        }
        Ok(deleted)
    }
}

impl TagRepository for MemoryStore {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>, StoreError> {
        let tables = self.tables()?;
        let mut found: Vec<Tag> = tables
            .tags
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn find_tag(&self, user_id: &str, id: &str) -> Result<Option<Tag>, StoreError> {
        let tables = self.tables()?;
        Ok(tables
            .tags
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    fn insert_tag(&self, tag: Tag) -> Result<Tag, StoreError> {
        let mut tables = self.tables()?;
        if tables
            .tags
            .iter()
            .any(|t| t.id == tag.id || (t.user_id == tag.user_id && t.name == tag.name))
        {
            return Err(StoreError::Conflict);
        }
        tables.tags.push(tag.clone());
        Ok(tag)
    }

    fn rename_tag(
        &self,
        user_id: &str,
        id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Tag>, StoreError> {
        let mut tables = self.tables()?;
        let Some(index) = tables
            .tags
            .iter()
            .position(|t| t.id == id && t.user_id == user_id)
        else {
            return Ok(None);
        };
        if tables
            .tags
            .iter()
            .any(|t| t.id != id && t.user_id == user_id && t.name == name)
        {
            return Err(StoreError::Conflict);
        }

        let tag = &mut tables.tags[index];
        tag.name = name.to_owned();
        tag.updated_at = now;
        Ok(Some(tag.clone()))
    }

    fn delete_tag(&self, user_id: &str, id: &str) -> Result<usize, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.tags.len();
        tables.tags.retain(|t| !(t.id == id && t.user_id == user_id));
        let deleted = before - tables.tags.len();
        if deleted > 0 {
            for note in tables.notes.iter_mut().filter(|n| n.user_id == user_id) {
                note.tags.retain(|t| t != id);
            }
        }
        Ok(deleted)
    }
}

impl UserRepository for MemoryStore {
    fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.tables()?;
        if tables
            .users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username)
        {
            return Err(StoreError::Conflict);
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const ALICE: &str = "aaaaaaaaaaaaaaaaaaaaaa01";
    const BOB: &str = "bbbbbbbbbbbbbbbbbbbbbb01";

    fn folder(id: &str, owner: &str, name: &str) -> Folder {
        let now = Utc::now();
        Folder {
            id: id.to_string(),
            user_id: owner.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn tag(id: &str, owner: &str, name: &str) -> Tag {
        let now = Utc::now();
        Tag {
            id: id.to_string(),
            user_id: owner.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn note(id: &str, owner: &str, folder: Option<&str>, tags: &[&str]) -> Note {
        let now = Utc::now();
        Note {
            id: id.to_string(),
            user_id: owner.to_string(),
            title: format!("note {id}"),
            content: None,
            folder_id: folder.map(str::to_owned),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn lists_most_recently_updated_first() {
        let store = MemoryStore::new();
        let mut old = note("000000000000000000000001", ALICE, None, &[]);
        old.updated_at = old.updated_at - Duration::hours(1);
        store.insert_note(old).unwrap();
        store
            .insert_note(note("000000000000000000000002", ALICE, None, &[]))
            .unwrap();

        let ids: Vec<String> = store
            .find_notes(&NoteFilter::owned_by(ALICE))
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, ["000000000000000000000002", "000000000000000000000001"]);
    }

    #[test]
    fn rejects_references_owned_by_someone_else() {
        let store = MemoryStore::new();
        store
            .insert_folder(folder("ffffffffffffffffffffff01", BOB, "bob's"))
            .unwrap();
        store
            .insert_tag(tag("cccccccccccccccccccccc01", BOB, "bob's"))
            .unwrap();

        let err = store
            .insert_note(note("000000000000000000000001", ALICE, Some("ffffffffffffffffffffff01"), &[]))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference("folderId")));

        let err = store
            .insert_note(note("000000000000000000000001", ALICE, None, &["cccccccccccccccccccccc01"]))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference("tags")));
    }

    #[test]
    fn update_of_foreign_note_finds_nothing() {
        let store = MemoryStore::new();
        store
            .insert_note(note("000000000000000000000001", BOB, None, &[]))
            .unwrap();
        let changes = NoteChanges {
            title: "stolen".to_string(),
            content: None,
            folder_id: None,
            tags: vec![],
            updated_at: Utc::now(),
        };
        assert_eq!(
            store
                .update_note(ALICE, "000000000000000000000001", changes)
                .unwrap(),
            None
        );
    }

    #[test]
    fn deleting_folder_and_tag_detaches_notes() {
        let store = MemoryStore::new();
        store
            .insert_folder(folder("ffffffffffffffffffffff01", ALICE, "work"))
            .unwrap();
        store
            .insert_tag(tag("cccccccccccccccccccccc01", ALICE, "urgent"))
            .unwrap();
        store
            .insert_note(note(
                "000000000000000000000001",
                ALICE,
                Some("ffffffffffffffffffffff01"),
                &["cccccccccccccccccccccc01"],
            ))
            .unwrap();

        assert_eq!(store.delete_folder(ALICE, "ffffffffffffffffffffff01").unwrap(), 1);
        assert_eq!(store.delete_tag(ALICE, "cccccccccccccccccccccc01").unwrap(), 1);

        let n = store
            .find_note(&NoteFilter::owned_by(ALICE).with_id("000000000000000000000001"))
            .unwrap()
            .unwrap();
        assert_eq!(n.folder_id, None);
        assert!(n.tags.is_empty());
    }

    #[test]
    fn names_are_unique_per_user() {
        let store = MemoryStore::new();
        store
            .insert_folder(folder("ffffffffffffffffffffff01", ALICE, "work"))
            .unwrap();
        store
            .insert_folder(folder("ffffffffffffffffffffff02", BOB, "work"))
            .unwrap();
        assert!(matches!(
            store.insert_folder(folder("ffffffffffffffffffffff03", ALICE, "work")),
            Err(StoreError::Conflict)
        ));
    }
}
