//! Request orchestration: validate, scope to the caller, call the store once,
//! shape the result. Handlers run these on the blocking pool.

pub mod folder;
pub mod note;
pub mod tag;
pub mod user;
