use serde::Serialize;
use std::fmt;

pub mod form;

/// Public part of a registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub email: String,
    pub name: String,
}

struct CredentialRecord {
    email: String,
    password: String,
    name: String,
}

impl CredentialRecord {
    fn identity(&self) -> Identity {
        Identity {
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

/// In-memory account store with a single active session.
///
/// Lives only as long as the process. The owner hands out `&mut` access to
/// whatever drives register/login/logout; there is no global instance.
#[derive(Debug, Default)]
pub struct CredentialStore {
    records: Vec<CredentialRecord>,
    session: Option<Identity>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account. Returns `false` when `email` is already registered.
    ///
    /// No format or strength checks happen here; see [`form`] for the
    /// checks a front end runs first.
    pub fn register(&mut self, email: &str, password: &str, name: &str) -> bool {
        if self.records.iter().any(|r| r.email == email) {
            tracing::debug!(email, "registration rejected: email already registered");
            return false;
        }

        self.records.push(CredentialRecord {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        });
        tracing::debug!(email, "registered new account");
        true
    }

    /// Start a session for the first account matching both fields exactly.
    ///
    /// A failed attempt leaves any existing session untouched.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let found = self
            .records
            .iter()
            .find(|r| r.email == email && r.password == password);

        match found {
            Some(record) => {
                self.session = Some(record.identity());
                tracing::debug!(email, "login succeeded");
                true
            }
            None => {
                tracing::debug!(email, "login failed");
                false
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(identity) = self.session.take() {
            tracing::debug!(email = %identity.email, "logged out");
        }
    }

    pub fn current_user(&self) -> Option<&Identity> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Registered accounts in registration order, without passwords.
    pub fn identities(&self) -> impl Iterator<Item = Identity> + '_ {
        self.records.iter().map(CredentialRecord::identity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
