use chrono::Utc;

use crate::{
    errors::ServerError,
    models::user::{Credentials, User, UserInput, UserResponse},
    store::{StoreError, UserRepository},
    utils::new_id,
};

pub fn register<R: UserRepository + ?Sized>(
    repo: &R,
    input: UserInput,
) -> Result<UserResponse, ServerError> {
    let registration = input.validate()?;
    let user = User {
        id: new_id(),
        username: registration.username,
        fullname: registration.fullname,
        password: User::hash_password(&registration.password)?,
        created_at: Utc::now(),
    };

    match repo.insert_user(user) {
        Ok(user) => {
            log::info!("registered user {} ({})", user.username, user.id);
            Ok(user.into())
        }
        Err(StoreError::Conflict) => Err(ServerError::InvalidField(
            "The username already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Unknown usernames and wrong passwords are indistinguishable to the caller.
pub fn login<R: UserRepository + ?Sized>(
    repo: &R,
    credentials: &Credentials,
) -> Result<User, ServerError> {
    match repo.find_user_by_username(&credentials.username)? {
        Some(user) if user.verify_password(&credentials.password) => Ok(user),
        _ => {
            log::warn!("failed login for username {:?}", credentials.username);
            Err(ServerError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn alice() -> UserInput {
        UserInput {
            username: Some("alice".to_string()),
            password: Some("password123".to_string()),
            fullname: Some(" Alice Liddell ".to_string()),
        }
    }

    #[test]
    fn registers_then_logs_in() {
        let store = MemoryStore::new();
        let registered = register(&store, alice()).unwrap();
        assert_eq!(registered.fullname.as_deref(), Some("Alice Liddell"));

        let user = login(
            &store,
            &Credentials {
                username: "alice".to_string(),
                password: "password123".to_string(),
            },
        )
        .unwrap();
        assert_eq!(user.id, registered.id);
        assert_ne!(user.password, "password123");
    }

    #[test]
    fn username_is_unique() {
        let store = MemoryStore::new();
        register(&store, alice()).unwrap();
        assert!(matches!(
            register(&store, alice()),
            Err(ServerError::InvalidField(msg)) if msg == "The username already exists"
        ));
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let store = MemoryStore::new();
        register(&store, alice()).unwrap();
        for (username, password) in [("alice", "not-the-password"), ("nobody", "password123")] {
            let credentials = Credentials {
                username: username.to_string(),
                password: password.to_string(),
            };
            assert!(matches!(
                login(&store, &credentials),
                Err(ServerError::Unauthorized)
            ));
        }
    }
}
