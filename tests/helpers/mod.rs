#![allow(dead_code, unused_macros)]

use std::sync::Arc;

use actix_web::web;
use chrono::{Duration, Utc};
use noteful::{
    auth::JwtKeys,
    models::{folder::Folder, note::Note, tag::Tag, user::User},
    store::{FolderRepository, MemoryStore, NoteRepository, TagRepository, UserRepository},
    AppState,
};

/// Builds the test service over a fixture's state.
macro_rules! app {
    ($fixture:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($fixture.state.clone())
                .configure(noteful::routes),
        )
        .await
    };
}

pub const SECRET: &str = "test-secret";

pub const ALICE_ID: &str = "aaaaaaaaaaaaaaaaaaaaaa01";
pub const BOB_ID: &str = "bbbbbbbbbbbbbbbbbbbbbb01";
pub const ALICE_PASSWORD: &str = "wonderland";

pub const WORK_FOLDER: &str = "ffffffffffffffffffffff01";
pub const HOME_FOLDER: &str = "ffffffffffffffffffffff02";
pub const BOB_FOLDER: &str = "ffffffffffffffffffffff09";

pub const URGENT_TAG: &str = "cccccccccccccccccccccc01";
pub const IDEA_TAG: &str = "cccccccccccccccccccccc02";

pub const CATS_NOTE: &str = "dddddddddddddddddddddd01";
pub const DOGS_NOTE: &str = "dddddddddddddddddddddd02";
pub const GROCERY_NOTE: &str = "dddddddddddddddddddddd03";
pub const BOB_NOTE: &str = "dddddddddddddddddddddd09";

/// Valid format, never stored.
pub const MISSING_ID: &str = "000000000000000000000000";

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<AppState>,
    pub alice_token: String,
    pub bob_token: String,
}

impl Fixture {
    /// Alice owns two folders, two tags and three notes; Bob owns one of each
    /// kind so cross-user leaks show up in every listing.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let jwt = JwtKeys::new(SECRET, 3600);
        let now = Utc::now();

        store
            .insert_user(User {
                id: ALICE_ID.to_string(),
                username: "alice".to_string(),
                fullname: Some("Alice Liddell".to_string()),
                password: User::hash_password(ALICE_PASSWORD).unwrap(),
                created_at: now,
            })
            .unwrap();
        store
            .insert_user(User {
                id: BOB_ID.to_string(),
                username: "bob".to_string(),
                fullname: None,
                password: "unused".to_string(),
                created_at: now,
            })
            .unwrap();

        for (id, owner, name) in [
            (WORK_FOLDER, ALICE_ID, "Work"),
            (HOME_FOLDER, ALICE_ID, "Home"),
            (BOB_FOLDER, BOB_ID, "Work"),
        ] {
            store
                .insert_folder(Folder {
                    id: id.to_string(),
                    user_id: owner.to_string(),
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .unwrap();
        }

        for (id, name) in [(URGENT_TAG, "urgent"), (IDEA_TAG, "idea")] {
            store
                .insert_tag(Tag {
                    id: id.to_string(),
                    user_id: ALICE_ID.to_string(),
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .unwrap();
        }

        let notes = [
            (CATS_NOTE, ALICE_ID, "Why cats purr", Some(WORK_FOLDER), vec![URGENT_TAG]),
            (DOGS_NOTE, ALICE_ID, "Dogs and cats", Some(HOME_FOLDER), vec![URGENT_TAG, IDEA_TAG]),
            (GROCERY_NOTE, ALICE_ID, "Groceries", None, vec![]),
            (BOB_NOTE, BOB_ID, "Bob's cats", Some(BOB_FOLDER), vec![]),
        ];
        for (minutes, (id, owner, title, folder, tags)) in notes.into_iter().enumerate() {
            let at = now - Duration::minutes(minutes as i64);
            store
                .insert_note(Note {
                    id: id.to_string(),
                    user_id: owner.to_string(),
                    title: title.to_string(),
                    content: Some(format!("content of {}", title)),
                    folder_id: folder.map(str::to_owned),
                    tags: tags.into_iter().map(str::to_owned).collect(),
                    created_at: at,
                    updated_at: at,
                })
                .unwrap();
        }

        let alice_token = jwt.issue(ALICE_ID, "alice").unwrap();
        let bob_token = jwt.issue(BOB_ID, "bob").unwrap();
        let state = web::Data::new(AppState::new(store.clone(), jwt));

        Fixture {
            store,
            state,
            alice_token,
            bob_token,
        }
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
