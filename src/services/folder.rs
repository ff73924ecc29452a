use chrono::Utc;

use crate::{
    errors::ServerError,
    models::folder::{Folder, FolderInput},
    store::{FolderRepository, StoreError},
    utils::{new_id, parse_id},
};

fn duplicate_name(err: StoreError) -> ServerError {
    match err {
        StoreError::Conflict => {
            ServerError::InvalidField("Folder name already exists".to_string())
        }
        e => e.into(),
    }
}

pub fn list<R: FolderRepository + ?Sized>(
    repo: &R,
    user_id: &str,
) -> Result<Vec<Folder>, ServerError> {
    Ok(repo.list_folders(user_id)?)
}

pub fn get<R: FolderRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
) -> Result<Folder, ServerError> {
    let id = parse_id(id).ok_or(ServerError::InvalidIdentifier("id"))?;
    repo.find_folder(user_id, &id)?.ok_or(ServerError::NotFound)
}

pub fn create<R: FolderRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    input: FolderInput,
) -> Result<Folder, ServerError> {
    let name = input.validate()?;
    let now = Utc::now();
    let folder = repo
        .insert_folder(Folder {
            id: new_id(),
            user_id: user_id.to_owned(),
            name,
            created_at: now,
            updated_at: now,
        })
        .map_err(duplicate_name)?;
    log::debug!("folder {} created for user {}", folder.id, user_id);
    Ok(folder)
}

pub fn update<R: FolderRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
    input: FolderInput,
) -> Result<Folder, ServerError> {
    let id = parse_id(id).ok_or(ServerError::InvalidIdentifier("id"))?;
    let name = input.validate()?;
    repo.rename_folder(user_id, &id, &name, Utc::now())
        .map_err(duplicate_name)?
        .ok_or(ServerError::NotFound)
}

pub fn delete<R: FolderRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
) -> Result<(), ServerError> {
    let deleted = repo.delete_folder(user_id, &id.to_ascii_lowercase())?;
    log::debug!("deleted {} folder(s) with id {} for user {}", deleted, id, user_id);
    Ok(())
}
