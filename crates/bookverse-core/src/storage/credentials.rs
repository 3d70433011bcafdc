//! Credential store backed by `users.txt`.

use std::path::Path;

use tracing::{debug, info, warn};

use super::table::TextTable;
use super::types::{Credential, Role};
use crate::digest::{self, DigestScheme};
use crate::error::{BookVerseError, Result};

/// File name of the credential store inside the data directory.
pub const USERS_FILE: &str = "users.txt";

/// Registration and authentication against the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    table: TextTable<Credential>,
    scheme: DigestScheme,
}

impl CredentialStore {
    /// Store that digests new passwords with the legacy scheme.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_scheme(data_dir, DigestScheme::Legacy)
    }

    pub fn with_scheme(data_dir: &Path, scheme: DigestScheme) -> Self {
        Self {
            table: TextTable::new(data_dir, USERS_FILE),
            scheme,
        }
    }

    pub fn path(&self) -> &Path {
        self.table.path()
    }

    pub fn scheme(&self) -> DigestScheme {
        self.scheme
    }

    /// Register a new login.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty username or password, or a username
    ///   containing the delimiter
    /// - `DuplicateKey` if the role/username pair is already registered
    pub fn register(&self, role: Role, username: &str, password: &str) -> Result<Credential> {
        if username.trim().is_empty() {
            return Err(BookVerseError::InvalidInput(
                "Username must not be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(BookVerseError::InvalidInput(
                "Password must not be empty".to_string(),
            ));
        }

        let credential = Credential {
            role,
            username: username.to_string(),
            password_digest: digest::digest(self.scheme, password)?,
        };

        let _lock = self.table.lock()?;
        let existing = self.table.load_lenient()?;
        if existing
            .iter()
            .any(|c| c.role == role && c.username == username)
        {
            warn!(%role, username, "Rejected duplicate registration");
            return Err(BookVerseError::DuplicateKey(format!(
                "{} '{}' is already registered",
                role, username
            )));
        }
        self.table.append_locked(&credential)?;
        info!(%role, username, "Registered user");
        Ok(credential)
    }

    /// Check a login. The first row matching role, username and password wins.
    ///
    /// Returns `Ok(false)` when the store does not exist. Rows that do not
    /// decode (an unknown role from an old file, say) are skipped.
    pub fn authenticate(&self, role: Role, username: &str, password: &str) -> Result<bool> {
        let credentials = self.table.load_lenient()?;
        let matched = credentials.iter().any(|c| {
            c.role == role && c.username == username && digest::verify(password, &c.password_digest)
        });
        debug!(%role, username, matched, "Authentication attempt");
        Ok(matched)
    }

    /// Every registered credential in file order.
    pub fn list(&self) -> Result<Vec<Credential>> {
        self.table.load_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_register_then_authenticate() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        store.register(Role::Admin, "alice", "pw1").unwrap();

        assert!(store.authenticate(Role::Admin, "alice", "pw1").unwrap());
        assert!(!store.authenticate(Role::Admin, "alice", "wrong").unwrap());
        assert!(!store.authenticate(Role::Student, "alice", "pw1").unwrap());
    }

    #[test]
    fn test_authenticate_without_store_is_false() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(!store.authenticate(Role::Student, "bob", "pw").unwrap());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.register(Role::Student, "bob", "a").unwrap();

        let err = store.register(Role::Student, "bob", "b").unwrap_err();
        assert!(matches!(err, BookVerseError::DuplicateKey(_)));

        // Same name under the other role is a different account.
        store.register(Role::Admin, "bob", "c").unwrap();
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_legacy_rows_in_any_case_authenticate() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        let line = format!("admin,root,{}\n", digest::legacy_digest("secret"));
        fs::write(store.path(), line).unwrap();

        assert!(store.authenticate(Role::Admin, "root", "secret").unwrap());
    }

    #[test]
    fn test_undecodable_rows_do_not_block_login() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.register(Role::Admin, "alice", "pw1").unwrap();
        let mut contents = fs::read_to_string(store.path()).unwrap();
        contents.push_str("Teacher,carol,61
Student,broken
");
        fs::write(store.path(), contents).unwrap();

        assert!(store.authenticate(Role::Admin, "alice", "pw1").unwrap());
        assert!(!store.authenticate(Role::Admin, "alice", "nope").unwrap());

        store.register(Role::Student, "dave", "pw2").unwrap();
        assert!(store.authenticate(Role::Student, "dave", "pw2").unwrap());
        // The strict listing used by the integrity check still reports the file.
        assert!(matches!(store.list(), Err(BookVerseError::Parse { .. })));
    }

    #[test]
    fn test_register_rejects_bad_input() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(matches!(
            store.register(Role::Student, "", "pw"),
            Err(BookVerseError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register(Role::Student, "a,b", "pw"),
            Err(BookVerseError::InvalidInput(_))
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_argon2_and_legacy_rows_coexist() {
        let dir = tempdir().unwrap();
        CredentialStore::new(dir.path())
            .register(Role::Student, "old", "pw")
            .unwrap();
        let store = CredentialStore::with_scheme(dir.path(), DigestScheme::Argon2);
        store.register(Role::Student, "new", "pw").unwrap();

        assert!(store.authenticate(Role::Student, "old", "pw").unwrap());
        assert!(store.authenticate(Role::Student, "new", "pw").unwrap());
        assert!(!store.authenticate(Role::Student, "new", "nope").unwrap());
    }
}
