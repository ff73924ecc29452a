table! {
    users (id) {
        id -> Varchar,
        username -> Varchar,
        fullname -> Nullable<Varchar>,
        password -> Varchar,
        created_at -> Timestamptz,
    }
}

table! {
    folders (id) {
        id -> Varchar,
        user_id -> Varchar,
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    tags (id) {
        id -> Varchar,
        user_id -> Varchar,
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    notes (id) {
        id -> Varchar,
        user_id -> Varchar,
        title -> Varchar,
        content -> Nullable<Text>,
        folder_id -> Nullable<Varchar>,
        tags -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

joinable!(folders -> users (user_id));
joinable!(tags -> users (user_id));
joinable!(notes -> users (user_id));
joinable!(notes -> folders (folder_id));

allow_tables_to_appear_in_same_query!(users, folders, tags, notes);
