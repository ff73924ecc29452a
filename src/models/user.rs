use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use serde_derive::{Deserialize, Serialize};

use crate::{errors::ServerError, schema::users};

const PASSWORD_MIN: usize = 8;
// argon2 itself has no limit, the cap keeps request bodies honest
const PASSWORD_MAX: usize = 72;

#[derive(Clone, Debug, PartialEq, Queryable, Insertable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: String,
    pub username: String,
    pub fullname: Option<String>,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn hash_password(password: &str) -> Result<String, ServerError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password) {
            Ok(parsed_hash) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
            Err(e) => {
                log::error!("stored hash for user {} is unreadable: {e}", self.id);
                false
            }
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub fullname: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub fullname: Option<String>,
}

impl UserInput {
    pub fn validate(self) -> Result<Registration, ServerError> {
        let username = self.username.ok_or(ServerError::MissingField("username"))?;
        let password = self.password.ok_or(ServerError::MissingField("password"))?;

        for (field, value) in [("username", &username), ("password", &password)] {
            if value.trim() != value.as_str() {
                return Err(ServerError::InvalidField(format!(
                    "Field: '{}' cannot start or end with whitespace",
                    field
                )));
            }
        }

        if username.is_empty() {
            return Err(ServerError::InvalidField(
                "Field: 'username' must be at least 1 characters long".to_string(),
            ));
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(ServerError::InvalidField(format!(
                "Field: 'password' must be at least {} characters long",
                PASSWORD_MIN
            )));
        }
        if password.chars().count() > PASSWORD_MAX {
            return Err(ServerError::InvalidField(format!(
                "Field: 'password' must be at most {} characters long",
                PASSWORD_MAX
            )));
        }

        Ok(Registration {
            username,
            password,
            fullname: self
                .fullname
                .map(|f| f.trim().to_owned())
                .filter(|f| !f.is_empty()),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub fullname: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            fullname: user.fullname,
        }
    }
}
