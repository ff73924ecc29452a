//! Owner-scoped note predicates.
//!
//! A [`NoteFilter`] can only be started from an owner, so every query the
//! stores run is confined to one user's notes no matter which optional clauses
//! get folded in afterwards.

use serde_derive::Deserialize;

use crate::{
    errors::ServerError,
    models::note::Note,
    utils::{non_empty, parse_id},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Clause {
    Owner(String),
    Id(String),
    /// Case-insensitive substring of the title.
    TitleContains(String),
    Folder(String),
    Tag(String),
}

impl Clause {
    fn matches(&self, note: &Note) -> bool {
        match self {
            Clause::Owner(user_id) => &note.user_id == user_id,
            Clause::Id(id) => &note.id == id,
            Clause::TitleContains(term) => note
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            Clause::Folder(folder_id) => note.folder_id.as_ref() == Some(folder_id),
            Clause::Tag(tag_id) => note.tags.contains(tag_id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteFilter {
    clauses: Vec<Clause>,
}

impl NoteFilter {
    pub fn owned_by(user_id: &str) -> Self {
        NoteFilter {
            clauses: vec![Clause::Owner(user_id.to_owned())],
        }
    }

    fn and(mut self, clause: Clause) -> Self {
        if !self.clauses.contains(&clause) {
            self.clauses.push(clause);
        }
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.and(Clause::Id(id.to_owned()))
    }

    pub fn title_contains(self, term: &str) -> Self {
        if term.is_empty() {
            self
        } else {
            self.and(Clause::TitleContains(term.to_owned()))
        }
    }

    pub fn in_folder(self, folder_id: &str) -> Self {
        self.and(Clause::Folder(folder_id.to_owned()))
    }

    pub fn tagged(self, tag_id: &str) -> Self {
        self.and(Clause::Tag(tag_id.to_owned()))
    }

    pub fn owner(&self) -> &str {
        match &self.clauses[0] {
            Clause::Owner(user_id) => user_id,
            _ => unreachable!("a note filter always starts with its owner"),
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.clauses.iter().all(|clause| clause.matches(note))
    }
}

/// Query string of `GET /notes`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteQuery {
    pub search_term: Option<String>,
    pub folder_id: Option<String>,
    pub tag_id: Option<String>,
}

impl NoteQuery {
    /// Drops blank parameters and rejects malformed folder/tag ids, so the
    /// composer only ever sees well-formed, lowercased values.
    pub fn validate(self) -> Result<NoteQuery, ServerError> {
        let folder_id = non_empty(self.folder_id)
            .map(|id| parse_id(&id).ok_or(ServerError::InvalidIdentifier("folderId")))
            .transpose()?;
        let tag_id = non_empty(self.tag_id)
            .map(|id| parse_id(&id).ok_or(ServerError::InvalidIdentifier("tagId")))
            .transpose()?;

        Ok(NoteQuery {
            search_term: self.search_term.filter(|t| !t.is_empty()),
            folder_id,
            tag_id,
        })
    }
}

pub fn compose_filter(user_id: &str, query: &NoteQuery) -> NoteFilter {
    let mut filter = NoteFilter::owned_by(user_id);
    if let Some(term) = &query.search_term {
        filter = filter.title_contains(term);
    }
    if let Some(folder_id) = &query.folder_id {
        filter = filter.in_folder(folder_id);
    }
    if let Some(tag_id) = &query.tag_id {
        filter = filter.tagged(tag_id);
    }
    filter
}
