//! Auth Gate for Tagmark.
//!
//! A single shared username/password pair guards every protocol action.
//! With both values empty the gate is open and every request passes.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::types::errors::BookmarkError;
use crate::types::protocol::Credentials;

/// Trait defining a credential check.
pub trait Authenticator: Send + Sync {
    /// Returns true when no credentials are required at all.
    fn is_open(&self) -> bool;
    /// Returns true when the supplied pair matches.
    fn check_credentials(&self, username: &str, password: &str) -> bool;
}

/// The shared credential pair from the server configuration.
///
/// Both values are wiped from memory when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedCredentials {
    username: String,
    password: String,
}

impl SharedCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for SharedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Authenticator for SharedCredentials {
    fn is_open(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    fn check_credentials(&self, username: &str, password: &str) -> bool {
        if self.is_open() {
            return true;
        }
        // Evaluate both comparisons so timing does not reveal which one failed.
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }
}

/// Compares two byte strings without stopping at the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Gate applied once to every inbound request before it reaches the database.
pub struct AuthGate {
    authenticator: Box<dyn Authenticator>,
}

impl AuthGate {
    pub fn new(authenticator: Box<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Gate that lets every request through.
    pub fn open() -> Self {
        Self::new(Box::new(SharedCredentials::new("", "")))
    }

    pub fn is_open(&self) -> bool {
        self.authenticator.is_open()
    }

    /// Checks the credentials carried by a request.
    ///
    /// # Errors
    /// `Unauthorized` when the gate is closed and either field is missing or wrong.
    pub fn authorize(&self, credentials: &Credentials) -> Result<(), BookmarkError> {
        if self.authenticator.is_open() {
            return Ok(());
        }
        match (credentials.username.as_deref(), credentials.password.as_deref()) {
            (Some(username), Some(password))
                if self.authenticator.check_credentials(username, password) =>
            {
                Ok(())
            }
            _ => Err(BookmarkError::Unauthorized),
        }
    }
}
