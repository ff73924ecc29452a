use chrono::{DateTime, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::sql_types::{Array, Text};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use super::{FolderRepository, NoteRepository, StoreError, TagRepository, UserRepository};
use crate::{
    filter::{Clause, NoteFilter},
    models::{
        folder::Folder,
        note::{Note, NoteChanges},
        tag::Tag,
        user::User,
    },
    schema::{folders, notes, tags, users},
    utils::escape_like,
};

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

define_sql_function! {
    fn array_remove(array: Array<Text>, element: Text) -> Array<Text>;
}

pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Builds the connection pool and applies pending migrations.
    pub fn connect(database_url: &str) -> Result<PgStore, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = r2d2::Pool::builder().build(manager)?;

        let mut connection = pool.get()?;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        for version in applied {
            log::info!("applied migration {}", version);
        }

        Ok(PgStore { pool })
    }
}

fn notes_matching(filter: &NoteFilter) -> notes::BoxedQuery<'static, Pg> {
    filter
        .clauses()
        .iter()
        .fold(notes::table.into_boxed(), |query, clause| match clause {
            Clause::Owner(user_id) => query.filter(notes::user_id.eq(user_id.clone())),
            Clause::Id(id) => query.filter(notes::id.eq(id.clone())),
            Clause::TitleContains(term) => {
                query.filter(notes::title.ilike(format!("%{}%", escape_like(term))))
            }
            Clause::Folder(folder_id) => query.filter(notes::folder_id.eq(folder_id.clone())),
            Clause::Tag(tag_id) => query.filter(notes::tags.contains(vec![tag_id.clone()])),
        })
}

fn check_references(
    connection: &mut PgConnection,
    owner: &str,
    folder_id: Option<&str>,
    tag_ids: &[String],
) -> Result<(), StoreError> {
    if let Some(folder_id) = folder_id {
        let owned: i64 = folders::table
            .filter(folders::id.eq(folder_id))
            .filter(folders::user_id.eq(owner))
            .count()
            .get_result(connection)?;
        if owned == 0 {
            return Err(StoreError::InvalidReference("folderId"));
        }
    }

    if !tag_ids.is_empty() {
        let owned: i64 = tags::table
            .filter(tags::id.eq_any(tag_ids))
            .filter(tags::user_id.eq(owner))
            .count()
            .get_result(connection)?;
        if owned != tag_ids.len() as i64 {
            return Err(StoreError::InvalidReference("tags"));
        }
    }

    Ok(())
}

impl NoteRepository for PgStore {
    fn find_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(notes_matching(filter)
            .order((notes::updated_at.desc(), notes::id.asc()))
            .load::<Note>(&mut connection)?)
    }

    fn find_note(&self, filter: &NoteFilter) -> Result<Option<Note>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(notes_matching(filter)
            .first::<Note>(&mut connection)
            .optional()?)
    }

    fn count_notes(&self, filter: &NoteFilter) -> Result<i64, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(notes_matching(filter)
            .count()
            .get_result::<i64>(&mut connection)?)
    }

    fn insert_note(&self, note: Note) -> Result<Note, StoreError> {
        let mut connection = self.pool.get()?;
        connection.transaction::<_, StoreError, _>(|connection| {
            check_references(
                connection,
                &note.user_id,
                note.folder_id.as_deref(),
                &note.tags,
            )?;
            Ok(diesel::insert_into(notes::table)
                .values(&note)
                .get_result::<Note>(connection)?)
        })
    }

    fn update_note(
        &self,
        user_id: &str,
        id: &str,
        changes: NoteChanges,
    ) -> Result<Option<Note>, StoreError> {
        let mut connection = self.pool.get()?;
        connection.transaction::<_, StoreError, _>(|connection| {
            let updated = diesel::update(
                notes::table
                    .filter(notes::id.eq(id))
                    .filter(notes::user_id.eq(user_id)),
            )
            .set(&changes)
            .get_result::<Note>(connection)
            .optional()?;

            // rolled back with the transaction when a reference is foreign
            if updated.is_some() {
                check_references(
                    connection,
                    user_id,
                    changes.folder_id.as_deref(),
                    &changes.tags,
                )?;
            }
            Ok(updated)
        })
    }

    fn delete_note(&self, user_id: &str, id: &str) -> Result<usize, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(diesel::delete(
            notes::table
                .filter(notes::id.eq(id))
                .filter(notes::user_id.eq(user_id)),
        )
        .execute(&mut connection)?)
    }
}

impl FolderRepository for PgStore {
    fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(folders::table
            .filter(folders::user_id.eq(user_id))
            .order(folders::name.asc())
            .load::<Folder>(&mut connection)?)
    }

    fn find_folder(&self, user_id: &str, id: &str) -> Result<Option<Folder>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(folders::table
            .filter(folders::id.eq(id))
            .filter(folders::user_id.eq(user_id))
            .first::<Folder>(&mut connection)
            .optional()?)
    }

    fn insert_folder(&self, folder: Folder) -> Result<Folder, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(diesel::insert_into(folders::table)
            .values(&folder)
            .get_result::<Folder>(&mut connection)?)
    }

    fn rename_folder(
        &self,
        user_id: &str,
        id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Folder>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(diesel::update(
            folders::table
                .filter(folders::id.eq(id))
                .filter(folders::user_id.eq(user_id)),
        )
        .set((folders::name.eq(name), folders::updated_at.eq(now)))
        .get_result::<Folder>(&mut connection)
        .optional()?)
    }

    fn delete_folder(&self, user_id: &str, id: &str) -> Result<usize, StoreError> {
        let mut connection = self.pool.get()?;
        // notes.folder_id is ON DELETE SET NULL
        Ok(diesel::delete(
            folders::table
                .filter(folders::id.eq(id))
                .filter(folders::user_id.eq(user_id)),
        )
        .execute(&mut connection)?)
    }
}

impl TagRepository for PgStore {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(tags::table
            .filter(tags::user_id.eq(user_id))
            .order(tags::name.asc())
            .load::<Tag>(&mut connection)?)
    }

    fn find_tag(&self, user_id: &str, id: &str) -> Result<Option<Tag>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(tags::table
            .filter(tags::id.eq(id))
            .filter(tags::user_id.eq(user_id))
            .first::<Tag>(&mut connection)
            .optional()?)
    }

    fn insert_tag(&self, tag: Tag) -> Result<Tag, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(diesel::insert_into(tags::table)
            .values(&tag)
            .get_result::<Tag>(&mut connection)?)
    }

    fn rename_tag(
        &self,
        user_id: &str,
        id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Tag>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(diesel::update(
            tags::table
                .filter(tags::id.eq(id))
                .filter(tags::user_id.eq(user_id)),
        )
        .set((tags::name.eq(name), tags::updated_at.eq(now)))
        .get_result::<Tag>(&mut connection)
        .optional()?)
    }

    fn delete_tag(&self, user_id: &str, id: &str) -> Result<usize, StoreError> {
        let mut connection = self.pool.get()?;
        connection.transaction::<_, StoreError, _>(|connection| {
            let deleted = diesel::delete(
                tags::table
                    .filter(tags::id.eq(id))
                    .filter(tags::user_id.eq(user_id)),
            )
            .execute(connection)?;

            if deleted > 0 {
                diesel::update(
                    notes::table
                        .filter(notes::user_id.eq(user_id))
                        .filter(notes::tags.contains(vec![id.to_owned()])),
                )
                .set(notes::tags.eq(array_remove(notes::tags, id)))
                .execute(connection)?;
            }
            Ok(deleted)
        })
    }
}

impl UserRepository for PgStore {
    fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(diesel::insert_into(users::table)
            .values(&user)
            .get_result::<User>(&mut connection)?)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut connection = self.pool.get()?;
        Ok(users::table
            .filter(users::username.eq(username))
            .first::<User>(&mut connection)
            .optional()?)
    }
}
