pub mod folder;
pub mod note;
pub mod tag;
pub mod user;
