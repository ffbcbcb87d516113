use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use smartjob_logging::redacted;

/// Opaque Basic-auth token derived from a username/password pair.
///
/// The token is base64 of `username:password`. It is never printed by
/// `Debug`, so a credential can sit inside logged state safely.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn derive(username: &str, password: &str) -> Self {
        Self(STANDARD.encode(format!("{username}:{password}")))
    }

    /// Wraps a token previously produced by [`Credential::derive`], e.g. one
    /// read back from persistent storage. The shape is not validated.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("Basic {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&redacted(&self.0)).finish()
    }
}

/// Plain-text password held only while a login is being negotiated.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&redacted(&self.0)).finish()
    }
}

/// Persistence for the single credential string.
///
/// `load` never fails: anything unreadable is reported as absent.
pub trait CredentialStore {
    /// Returns false when the credential could not be persisted.
    fn save(&mut self, credential: &Credential) -> bool;
    fn load(&self) -> Option<Credential>;
    fn clear(&mut self);
}

/// Process-local store, used by tests and embedders without a disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Option<Credential>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&mut self, credential: &Credential) -> bool {
        self.slot = Some(credential.clone());
        true
    }

    fn load(&self) -> Option<Credential> {
        self.slot.clone()
    }

    fn clear(&mut self) {
        self.slot = None;
    }
}

/// Session gate: authenticated iff a credential is held.
///
/// This is a presence check only. A revoked credential is discovered when the
/// next authenticated call fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    credential: Option<Credential>,
}

impl Session {
    pub fn get(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn set(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    pub fn clear(&mut self) {
        self.credential = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}
