use studio_portal::gate::{self, GateError, ProtectedResource};
use studio_portal::session::{InMemorySessionStore, SessionStore};

// Fixture resource, independent of the built-in registry.
const DECK: ProtectedResource = ProtectedResource {
    storage_key: "test-deck",
    secret: "open-sesame",
    title: "Test Deck",
    description: "Fixture resource",
};

#[test]
fn test_correct_secret_unlocks() {
    assert!(gate::verify(&DECK, "open-sesame").is_ok());
}

#[test]
fn test_incorrect_secret_stays_locked_with_error() {
    let err = gate::verify(&DECK, "open-says-me").unwrap_err();
    assert_eq!(err, GateError::IncorrectPassword);
    assert!(!err.message().is_empty());
}

#[test]
fn test_comparison_is_case_sensitive() {
    assert!(gate::verify(&DECK, "Open-Sesame").is_err());
}

#[test]
fn test_empty_submission_blocked_before_comparison() {
    assert_eq!(
        gate::verify(&DECK, "").unwrap_err(),
        GateError::MissingPassword
    );

    // Even a resource with an empty secret rejects the empty submission:
    // the required-field check runs before any comparison does.
    let open = ProtectedResource {
        storage_key: "open",
        secret: "",
        title: "Open",
        description: "",
    };
    assert_eq!(
        gate::verify(&open, "").unwrap_err(),
        GateError::MissingPassword
    );
}

#[test]
fn test_registry_lookup() {
    assert!(gate::find_resource("work-canvas").is_some());
    assert!(gate::find_resource("no-such-resource").is_none());
}

#[test]
fn test_registry_keys_unique() {
    let mut keys: Vec<_> = gate::PROTECTED_RESOURCES
        .iter()
        .map(|r| r.storage_key)
        .collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), gate::PROTECTED_RESOURCES.len());
}

#[tokio::test]
async fn test_unlock_transitions_once_and_is_terminal() {
    let store = InMemorySessionStore::new();
    let session_id = store.create().await;

    // Locked until the exact secret is submitted.
    assert!(!store.is_unlocked(session_id, DECK.storage_key).await);
    assert!(gate::verify(&DECK, "wrong").is_err());
    assert!(!store.is_unlocked(session_id, DECK.storage_key).await);

    gate::verify(&DECK, "open-sesame").unwrap();
    store.grant_unlock(session_id, DECK.storage_key).await;
    assert!(store.is_unlocked(session_id, DECK.storage_key).await);

    // A later failed submission does not re-lock: Unlocked is terminal for the session.
    assert!(gate::verify(&DECK, "wrong-again").is_err());
    assert!(store.is_unlocked(session_id, DECK.storage_key).await);
}

#[tokio::test]
async fn test_flags_are_independent_per_storage_key() {
    let store = InMemorySessionStore::new();
    let session_id = store.create().await;

    store.grant_unlock(session_id, "resource-a").await;

    assert!(store.is_unlocked(session_id, "resource-a").await);
    assert!(!store.is_unlocked(session_id, "resource-b").await);
}

#[tokio::test]
async fn test_flags_are_independent_per_session() {
    let store = InMemorySessionStore::new();
    let first = store.create().await;
    let second = store.create().await;

    store.grant_unlock(first, DECK.storage_key).await;

    assert!(store.is_unlocked(first, DECK.storage_key).await);
    assert!(!store.is_unlocked(second, DECK.storage_key).await);
}

#[tokio::test]
async fn test_destroyed_session_loses_unlocks() {
    let store = InMemorySessionStore::new();
    let session_id = store.create().await;

    store.grant_unlock(session_id, DECK.storage_key).await;
    store.destroy(session_id).await;

    assert!(!store.is_unlocked(session_id, DECK.storage_key).await);
    assert!(!store.grant_unlock(session_id, DECK.storage_key).await);
}
