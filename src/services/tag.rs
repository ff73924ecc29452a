use chrono::Utc;

use crate::{
    errors::ServerError,
    models::tag::{Tag, TagInput},
    store::{TagRepository, StoreError},
    utils::{new_id, parse_id},
};

fn duplicate_name(err: StoreError) -> ServerError {
    match err {
        StoreError::Conflict => {
            ServerError::InvalidField("Tag name already exists".to_string())
        }
        e => e.into(),
    }
}

pub fn list<R: TagRepository + ?Sized>(
    repo: &R,
    user_id: &str,
) -> Result<Vec<Tag>, ServerError> {
    Ok(repo.list_tags(user_id)?)
}

pub fn get<R: TagRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
) -> Result<Tag, ServerError> {
    let id = parse_id(id).ok_or(ServerError::InvalidIdentifier("id"))?;
    repo.find_tag(user_id, &id)?.ok_or(ServerError::NotFound)
}

pub fn create<R: TagRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    input: TagInput,
) -> Result<Tag, ServerError> {
    let name = input.validate()?;
    let now = Utc::now();
    let tag = repo
        .insert_tag(Tag {
            id: new_id(),
            user_id: user_id.to_owned(),
            name,
            created_at: now,
            updated_at: now,
        })
        .map_err(duplicate_name)?;
    log::debug!("tag {} created for user {}", tag.id, user_id);
    Ok(tag)
}

pub fn update<R: TagRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
    input: TagInput,
) -> Result<Tag, ServerError> {
    let id = parse_id(id).ok_or(ServerError::InvalidIdentifier("id"))?;
    let name = input.validate()?;
    repo.rename_tag(user_id, &id, &name, Utc::now())
        .map_err(duplicate_name)?
        .ok_or(ServerError::NotFound)
}

/// Removing a tag also strips it from every note of the owner.
pub fn delete<R: TagRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
) -> Result<(), ServerError> {
    let deleted = repo.delete_tag(user_id, &id.to_ascii_lowercase())?;
    log::debug!("deleted {} tag(s) with id {} for user {}", deleted, id, user_id);
    Ok(())
}
