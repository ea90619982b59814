use crate::error::SessionError;
use crate::session::{FileStore, MemoryStore, Session, SessionContext, SessionStore, TOKEN_KEY, USERNAME_KEY};

use common::{ErrorLocation, RedactedSecret};

use std::panic::Location;

/// Memory store that refuses writes to one chosen key.
struct FailingStore {
    inner: MemoryStore,
    fail_on: &'static str,
}

impl FailingStore {
    fn new(fail_on: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_on,
        }
    }

    fn refuse(&self, key: &str) -> Result<(), SessionError> {
        if key == self.fail_on {
            return Err(SessionError::SerializeError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("write to '{key}' refused"),
            });
        }
        Ok(())
    }
}

impl SessionStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.refuse(key)?;
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.refuse(key)?;
        self.inner.remove(key)
    }
}

#[test]
fn given_empty_store_when_reading_session_then_anonymous() {
    let context = SessionContext::new(MemoryStore::new());

    let session = context.current().unwrap();

    assert_eq!(session, Session::anonymous());
    assert!(!session.is_authenticated());
    assert_eq!(session.username_header(), "");
    assert_eq!(session.token_header(), "");
}

/// **VALUE**: Verifies populate/clear write the fixed keys.
///
/// **WHY THIS MATTERS**: Other consumers of the store look entries up by the literal
/// names `username` and `token`.
#[test]
fn given_context_when_populated_and_cleared_then_fixed_keys_follow() {
    let mut context = SessionContext::new(MemoryStore::new());

    context
        .populate("shnoo", &RedactedSecret::new("token-123"))
        .unwrap();

    assert_eq!(context.store().get(USERNAME_KEY).unwrap().as_deref(), Some("shnoo"));
    assert_eq!(context.store().get(TOKEN_KEY).unwrap().as_deref(), Some("token-123"));
    assert!(context.current().unwrap().is_authenticated());

    context.clear().unwrap();

    assert!(context.store().is_empty());
    assert_eq!(context.current().unwrap(), Session::anonymous());
}

#[test]
fn given_empty_token_when_checking_authentication_then_not_authenticated() {
    let session = Session::new("alex", "");

    assert!(!session.is_authenticated());
}

/// **VALUE**: Verifies the file store survives a "restart" (new instance, same path).
#[test]
fn given_file_store_when_reopened_then_entries_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let mut store = FileStore::new(&path);
    store.set(USERNAME_KEY, "alex").unwrap();
    store.set(TOKEN_KEY, "abc").unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get(USERNAME_KEY).unwrap().as_deref(), Some("alex"));
    assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    assert!(!dir.path().join("nested").join("session.json.tmp").exists(), "temp file renamed away");
}

#[test]
fn given_missing_file_when_reading_then_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("session.json"));

    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn given_missing_key_when_removed_then_file_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let mut store = FileStore::new(&path);

    store.remove(TOKEN_KEY).unwrap();

    assert!(!path.exists());
}

#[test]
fn given_corrupted_file_when_reading_then_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let result = FileStore::new(&path).get(TOKEN_KEY);

    assert!(matches!(result, Err(SessionError::ParseError { .. })));
}

/// **VALUE**: Session Debug output hides the token.
#[test]
fn given_session_when_debug_formatted_then_token_hidden() {
    let session = Session::new("alex", "secret-token-value");

    let debug = format!("{:?}", session);

    assert!(debug.contains("alex"));
    assert!(!debug.contains("secret-token-value"));
}

/// **VALUE**: Verifies a failed populate leaves pre-existing entries untouched.
///
/// **BUG THIS CATCHES**: Would catch a rollback that wipes entries the login never wrote.
#[test]
fn given_stray_username_when_populate_fails_then_entries_restored() {
    // GIVEN: A store holding a leftover username and refusing token writes
    let mut store = FailingStore::new(TOKEN_KEY);
    store.inner.set(USERNAME_KEY, "ghost").unwrap();
    let mut context = SessionContext::new(store);

    // WHEN: Populating a new pair
    let result = context.populate("alex", &RedactedSecret::new("token-123"));

    // THEN: Error, and the store is exactly as before
    assert!(result.is_err());
    assert_eq!(context.store().get(USERNAME_KEY).unwrap().as_deref(), Some("ghost"));
    assert_eq!(context.store().get(TOKEN_KEY).unwrap(), None);
}

/// **VALUE**: Verifies clear drops the token before the username.
///
/// **WHY THIS MATTERS**: If the second removal fails, what remains must not
/// still count as a login.
#[test]
fn given_username_removal_fails_when_clearing_then_no_longer_authenticated() {
    let mut store = FailingStore::new(USERNAME_KEY);
    store.inner.set(USERNAME_KEY, "alex").unwrap();
    store.inner.set(TOKEN_KEY, "token-123").unwrap();
    let mut context = SessionContext::new(store);

    let result = context.clear();

    assert!(result.is_err());
    assert_eq!(context.store().get(TOKEN_KEY).unwrap(), None);
    assert!(!context.current().unwrap().is_authenticated());
}

#[test]
fn given_file_store_when_removing_all_then_both_keys_gone_in_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let mut store = FileStore::new(&path);
    store.set(USERNAME_KEY, "alex").unwrap();
    store.set(TOKEN_KEY, "abc").unwrap();
    store.set("theme", "dark").unwrap();

    store.remove_all(&[TOKEN_KEY, USERNAME_KEY]).unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(reopened.get(USERNAME_KEY).unwrap(), None);
    assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
}
