use super::*;
use tempfile::TempDir;

fn setup() -> (Connection, TempDir) {
    (rmgd_db::open_memory().unwrap(), TempDir::new().unwrap())
}

#[test]
fn first_user_becomes_admin() {
    let (conn, tmp) = setup();
    let identity = LocalIdentity::new(&conn, tmp.path().join("session.toml"));
    assert!(identity.needs_bootstrap().unwrap());

    let first = identity.add_user("alice", "password1", Role::Contributor).unwrap();
    assert_eq!(first.role, Role::Admin);
    let second = identity.add_user("bob", "password2", Role::Contributor).unwrap();
    assert_eq!(second.role, Role::Contributor);
    assert!(!identity.needs_bootstrap().unwrap());
}

#[test]
fn login_logout_cycle() {
    let (conn, tmp) = setup();
    let identity = LocalIdentity::new(&conn, tmp.path().join("nested").join("session.toml"));
    identity.add_user("alice", "correct horse", Role::Admin).unwrap();

    assert_eq!(identity.current().unwrap(), None);
    assert!(matches!(
        identity.login("alice", "wrong password").unwrap_err(),
        SessionError::InvalidCredentials
    ));
    assert!(matches!(
        identity.login("nobody", "correct horse").unwrap_err(),
        SessionError::InvalidCredentials
    ));

    let actor = identity.login("alice", "correct horse").unwrap();
    assert_eq!(actor.username, "alice");
    assert_eq!(identity.current().unwrap(), Some(actor));

    identity.logout().unwrap();
    assert_eq!(identity.current().unwrap(), None);
    // Logging out twice is harmless.
    identity.logout().unwrap();
}

#[test]
fn role_changes_apply_to_live_session() {
    let (conn, tmp) = setup();
    let identity = LocalIdentity::new(&conn, tmp.path().join("session.toml"));
    identity.add_user("root", "rootroot", Role::Admin).unwrap();
    identity.add_user("carol", "carolcarol", Role::Contributor).unwrap();
    identity.login("carol", "carolcarol").unwrap();

    identity.set_role("carol", Role::Researcher).unwrap();
    assert_eq!(identity.current().unwrap().unwrap().role, Role::Researcher);

    identity.remove_user("carol").unwrap();
    assert_eq!(identity.current().unwrap(), None);
}

#[test]
fn last_admin_is_protected() {
    let (conn, tmp) = setup();
    let identity = LocalIdentity::new(&conn, tmp.path().join("session.toml"));
    identity.add_user("root", "rootroot", Role::Admin).unwrap();

    assert!(matches!(
        identity.remove_user("root").unwrap_err(),
        SessionError::LastAdmin
    ));
    assert!(matches!(
        identity.set_role("root", Role::Researcher).unwrap_err(),
        SessionError::LastAdmin
    ));

    identity.add_user("second", "secondsecond", Role::Admin).unwrap();
    identity.set_role("root", Role::Researcher).unwrap();
}

#[test]
fn credentials_are_validated() {
    let (conn, tmp) = setup();
    let identity = LocalIdentity::new(&conn, tmp.path().join("session.toml"));
    assert!(matches!(
        identity.add_user("bad name", "password1", Role::Admin).unwrap_err(),
        SessionError::InvalidUsername(_)
    ));
    assert!(matches!(
        identity.add_user("alice", "short", Role::Admin).unwrap_err(),
        SessionError::WeakPassword
    ));
}

#[test]
fn passwords_are_not_stored_in_clear() {
    let (conn, tmp) = setup();
    let identity = LocalIdentity::new(&conn, tmp.path().join("session.toml"));
    identity.add_user("alice", "password1", Role::Admin).unwrap();
    let stored = rmgd_db::find_user(&conn, "alice").unwrap().unwrap();
    assert_ne!(stored.password_hash, "password1");
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert!(!stored.password_hash.contains("password1"));
}

#[test]
fn same_password_hashes_differently_per_account() {
    let (conn, tmp) = setup();
    let identity = LocalIdentity::new(&conn, tmp.path().join("session.toml"));
    identity.add_user("alice", "password1", Role::Admin).unwrap();
    identity.add_user("bob", "password1", Role::Contributor).unwrap();
    let alice = rmgd_db::find_user(&conn, "alice").unwrap().unwrap();
    let bob = rmgd_db::find_user(&conn, "bob").unwrap().unwrap();
    assert_ne!(alice.password_hash, bob.password_hash);

    assert!(verify_password("password1", &alice.password_hash).unwrap());
    assert!(!verify_password("password2", &alice.password_hash).unwrap());
}

#[test]
fn malformed_stored_hash_is_an_error() {
    assert!(matches!(
        verify_password("password1", "not-a-phc-string").unwrap_err(),
        SessionError::Hash(_)
    ));
}

#[test]
fn corrupt_session_file_is_reported() {
    let (conn, tmp) = setup();
    let path = tmp.path().join("session.toml");
    std::fs::write(&path, "username = [").unwrap();
    let identity = LocalIdentity::new(&conn, &path);
    assert!(matches!(
        identity.current().unwrap_err(),
        SessionError::Corrupt { .. }
    ));
}
