use chrono::Utc;

use crate::{
    errors::ServerError,
    filter::{compose_filter, NoteFilter, NoteQuery},
    models::note::{NoteInput, NoteResponse},
    store::NoteRepository,
    utils::{new_id, parse_id},
};

pub fn list<R: NoteRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    query: NoteQuery,
) -> Result<Vec<NoteResponse>, ServerError> {
    let query = query.validate()?;
    let filter = compose_filter(user_id, &query);
    let notes = repo.find_notes(&filter)?;
    Ok(notes.into_iter().map(NoteResponse::from).collect())
}

pub fn get<R: NoteRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
) -> Result<NoteResponse, ServerError> {
    let id = parse_id(id).ok_or(ServerError::InvalidIdentifier("id"))?;
    let filter = NoteFilter::owned_by(user_id).with_id(&id);
    repo.find_note(&filter)?
        .map(NoteResponse::from)
        .ok_or(ServerError::NotFound)
}

pub fn create<R: NoteRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    input: NoteInput,
) -> Result<NoteResponse, ServerError> {
    let draft = input.validate()?;
    let note = repo.insert_note(draft.into_note(user_id, new_id(), Utc::now()))?;
    log::debug!("note {} created for user {}", note.id, user_id);
    Ok(NoteResponse::created(note))
}

pub fn update<R: NoteRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
    input: NoteInput,
) -> Result<NoteResponse, ServerError> {
    let id = parse_id(id).ok_or(ServerError::InvalidIdentifier("id"))?;
    let changes = input.validate()?.into_changes(Utc::now());
    let note = repo
        .update_note(user_id, &id, changes)?
        .ok_or(ServerError::NotFound)?;
    log::debug!("note {} updated for user {}", note.id, user_id);
    Ok(NoteResponse::from(note))
}

/// Succeeds whether or not a note was removed. The id is not
/// validated: a malformed id matches nothing, which is the same outcome.
pub fn delete<R: NoteRepository + ?Sized>(
    repo: &R,
    user_id: &str,
    id: &str,
) -> Result<(), ServerError> {
    let deleted = repo.delete_note(user_id, &id.to_ascii_lowercase())?;
    log::debug!("deleted {} note(s) with id {} for user {}", deleted, id, user_id);
    Ok(())
}
