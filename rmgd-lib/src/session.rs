//! Identity and session management.
//!
//! [`LocalIdentity`] keeps accounts in the catalog database and the signed-in
//! user in a small TOML session file. Passwords are stored as Argon2id
//! PHC strings; a hosted deployment would put an external identity
//! service behind [`IdentityProvider`] instead.

use std::path::{Path, PathBuf};

use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::Argon2;
use rmgd_core::{Capabilities, Role};
use rmgd_db::{OperationError, UserAccount};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(#[from] OperationError),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Corrupt session file {path}: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Invalid username '{0}': use letters, digits, '.', '-' or '_'")]
    InvalidUsername(String),
    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    WeakPassword,
    #[error("Cannot remove or demote the last admin")]
    LastAdmin,
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// The signed-in user as seen by the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn capabilities(&self) -> Capabilities {
        self.role.capabilities()
    }
}

impl From<&UserAccount> for Actor {
    fn from(user: &UserAccount) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Supplies the current actor and handles sign-in/out.
pub trait IdentityProvider {
    /// The signed-in actor, if any.
    fn current(&self) -> Result<Option<Actor>, SessionError>;
    fn login(&self, username: &str, password: &str) -> Result<Actor, SessionError>;
    fn logout(&self) -> Result<(), SessionError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    username: String,
    signed_in_at: String,
}

/// Accounts in SQLite, session in a file.
pub struct LocalIdentity<'a> {
    conn: &'a Connection,
    session_file: PathBuf,
}

/// Hash a password into a PHC string with a fresh random salt.
fn hash_password(password: &str) -> Result<String, SessionError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SessionError::Hash(e.to_string()))
}

/// Check a password against a stored PHC string.
fn verify_password(password: &str, stored: &str) -> Result<bool, SessionError> {
    let parsed = PasswordHash::new(stored).map_err(|e| SessionError::Hash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(SessionError::Hash(e.to_string())),
    }
}

fn validate_username(username: &str) -> Result<(), SessionError> {
    let ok = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        Err(SessionError::InvalidUsername(username.to_string()))
    }
}

impl<'a> LocalIdentity<'a> {
    pub fn new(conn: &'a Connection, session_file: impl Into<PathBuf>) -> Self {
        Self {
            conn,
            session_file: session_file.into(),
        }
    }

    /// Default session file location, next to the settings file.
    pub fn default_session_file() -> PathBuf {
        crate::settings::config_dir().join("session.toml")
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// True while no account exists; the first account becomes admin.
    pub fn needs_bootstrap(&self) -> Result<bool, SessionError> {
        Ok(rmgd_db::count_users(self.conn)? == 0)
    }

    /// Create an account. On an empty database the role is forced to admin.
    pub fn add_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Actor, SessionError> {
        validate_username(username)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::WeakPassword);
        }
        let role = if self.needs_bootstrap()? {
            if role != Role::Admin {
                log::info!("First account '{}' is created as admin", username);
            }
            Role::Admin
        } else {
            role
        };
        let account = UserAccount {
            username: username.to_string(),
            role,
            password_hash: hash_password(password)?,
            created_at: rmgd_db::now_timestamp(),
        };
        rmgd_db::insert_user(self.conn, &account)?;
        Ok(Actor::from(&account))
    }

    pub fn list_users(&self) -> Result<Vec<Actor>, SessionError> {
        Ok(rmgd_db::list_users(self.conn)?
            .iter()
            .map(Actor::from)
            .collect())
    }

    fn admin_count(&self) -> Result<usize, SessionError> {
        Ok(rmgd_db::list_users(self.conn)?
            .iter()
            .filter(|u| u.role == Role::Admin)
            .count())
    }

    fn is_last_admin(&self, username: &str) -> Result<bool, SessionError> {
        let user = rmgd_db::find_user(self.conn, username)?;
        Ok(user.is_some_and(|u| u.role == Role::Admin) && self.admin_count()? <= 1)
    }

    pub fn remove_user(&self, username: &str) -> Result<(), SessionError> {
        if self.is_last_admin(username)? {
            return Err(SessionError::LastAdmin);
        }
        rmgd_db::delete_user(self.conn, username)?;
        Ok(())
    }

    pub fn set_role(&self, username: &str, role: Role) -> Result<(), SessionError> {
        if role != Role::Admin && self.is_last_admin(username)? {
            return Err(SessionError::LastAdmin);
        }
        rmgd_db::set_user_role(self.conn, username, role)?;
        Ok(())
    }

    fn io_err(&self, e: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.session_file.display().to_string(),
            source: e,
        }
    }

    fn read_session(&self) -> Result<Option<SessionFile>, SessionError> {
        let contents = match std::fs::read_to_string(&self.session_file) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| SessionError::Corrupt {
                path: self.session_file.display().to_string(),
                reason: e.to_string(),
            })
    }

    fn write_session(&self, session: &SessionFile) -> Result<(), SessionError> {
        if let Some(parent) = self.session_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let serialized = toml::to_string(session).map_err(|e| SessionError::Corrupt {
            path: self.session_file.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(&self.session_file, serialized).map_err(|e| self.io_err(e))
    }
}

impl IdentityProvider for LocalIdentity<'_> {
    /// The role always comes from the database, so role changes apply to
    /// existing sessions. A session for a deleted account is ignored.
    fn current(&self) -> Result<Option<Actor>, SessionError> {
        let Some(session) = self.read_session()? else {
            return Ok(None);
        };
        let user = rmgd_db::find_user(self.conn, &session.username)?;
        if user.is_none() {
            log::warn!("Session user '{}' no longer exists", session.username);
        }
        Ok(user.as_ref().map(Actor::from))
    }

    fn login(&self, username: &str, password: &str) -> Result<Actor, SessionError> {
        let user = rmgd_db::find_user(self.conn, username)?
            .ok_or(SessionError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash)? {
            return Err(SessionError::InvalidCredentials);
        }
        self.write_session(&SessionFile {
            username: user.username.clone(),
            signed_in_at: rmgd_db::now_timestamp(),
        })?;
        Ok(Actor::from(&user))
    }

    fn logout(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.session_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
