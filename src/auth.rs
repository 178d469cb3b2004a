use crate::error::{BoardError, BoardResult};
use crate::model::{Role, SessionUser};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone)]
struct Credential {
    password_sha256: String,
    role: Role,
    name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    entries: HashMap<String, Credential>,
}

impl CredentialTable {
    pub fn insert(&mut self, email: &str, password: &str, role: Role, name: &str) {
        self.entries.insert(
            email.to_string(),
            Credential {
                password_sha256: password_digest(password),
                role,
                name: name.to_string(),
            },
        );
    }

    /// Never replaces an existing entry. Returns whether a new one was added.
    pub fn insert_if_absent(&mut self, email: &str, password: &str, role: Role, name: &str) -> bool {
        if self.entries.contains_key(email) {
            return false;
        }
        self.insert(email, password, role, name);
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Email is matched exactly, password verbatim (through its digest).
    pub fn verify(&self, email: &str, password: &str) -> BoardResult<SessionUser> {
        let Some(cred) = self.entries.get(email) else {
            return Err(BoardError::AuthFailed);
        };
        if cred.password_sha256 != password_digest(password) {
            return Err(BoardError::AuthFailed);
        }
        Ok(SessionUser {
            email: email.to_string(),
            role: cred.role,
            name: cred.name.clone(),
        })
    }
}
