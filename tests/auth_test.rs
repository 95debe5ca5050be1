use sendly::auth::device::TokenResponse;
use sendly::auth::storage::{AuthStorage, Credential, KeyKind};
use sendly::config::{ActiveTeam, Config};

/// Helper: create a temp dir with an AuthStorage pointing at it.
fn temp_storage() -> (AuthStorage, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sendly.db");
    let storage = AuthStorage::open(path.to_str().unwrap()).unwrap();
    (storage, dir)
}

fn session_tokens() -> TokenResponse {
    TokenResponse {
        access_token: "cli_access_abc".to_string(),
        refresh_token: "cli_refresh_def".to_string(),
        expires_in: 3600,
        user_id: "usr_123".to_string(),
        email: "ada@example.com".to_string(),
    }
}

// ── Storage CRUD ──────────────────────────────────────────────────

#[test]
fn get_returns_none_when_empty() {
    let (storage, _dir) = temp_storage();
    assert!(storage.get().unwrap().is_none());
}

#[test]
fn set_and_get_api_key() {
    let (storage, _dir) = temp_storage();
    storage.set_api_key("sk_test_abc").unwrap();

    match storage.get().unwrap().unwrap() {
        Credential::ApiKey { key } => assert_eq!(key, "sk_test_abc"),
        _ => panic!("expected ApiKey"),
    }
}

#[test]
fn set_and_get_session() {
    let (storage, _dir) = temp_storage();
    storage.set_session_tokens(&session_tokens()).unwrap();

    match storage.get().unwrap().unwrap() {
        Credential::Session {
            access,
            refresh,
            user_id,
            email,
            ..
        } => {
            assert_eq!(access, "cli_access_abc");
            assert_eq!(refresh, "cli_refresh_def");
            assert_eq!(user_id, "usr_123");
            assert_eq!(email, "ada@example.com");
        }
        _ => panic!("expected Session"),
    }
}

#[test]
fn clear_removes_credential() {
    let (storage, _dir) = temp_storage();
    storage.set_api_key("sk_test_abc").unwrap();
    storage.clear().unwrap();
    assert!(storage.get().unwrap().is_none());
}

#[test]
fn clear_on_empty_store_is_ok() {
    let (storage, _dir) = temp_storage();
    storage.clear().unwrap();
}

// ── Variant exclusivity ───────────────────────────────────────────

#[test]
fn session_then_api_key_leaves_only_api_key() {
    let (storage, _dir) = temp_storage();
    storage.set_session_tokens(&session_tokens()).unwrap();
    storage.set_api_key("sk_live_xyz").unwrap();

    match storage.get().unwrap().unwrap() {
        Credential::ApiKey { key } => assert_eq!(key, "sk_live_xyz"),
        _ => panic!("session token should have been replaced"),
    }
}

#[test]
fn api_key_then_session_leaves_only_session() {
    let (storage, _dir) = temp_storage();
    storage.set_api_key("sk_live_xyz").unwrap();
    storage.set_session_tokens(&session_tokens()).unwrap();

    match storage.get().unwrap().unwrap() {
        Credential::Session { access, .. } => assert_eq!(access, "cli_access_abc"),
        _ => panic!("api key should have been replaced"),
    }
}

// ── Expiry semantics ──────────────────────────────────────────────

#[test]
fn fresh_session_is_not_expired() {
    let (storage, _dir) = temp_storage();
    storage.set_session_tokens(&session_tokens()).unwrap();
    assert!(!storage.get().unwrap().unwrap().is_expired());
}

#[test]
fn expired_session_still_comes_back_some() {
    // The store distinguishes "no credential" from "expired credential";
    // expiry is the caller's concern.
    let (storage, _dir) = temp_storage();
    storage
        .set(&Credential::Session {
            access: "cli_old".to_string(),
            refresh: "ref".to_string(),
            expires: 1,
            user_id: "usr_1".to_string(),
            email: "a@b.c".to_string(),
        })
        .unwrap();

    let cred = storage.get().unwrap().unwrap();
    assert!(cred.is_expired());
}

#[test]
fn api_keys_never_expire() {
    let (storage, _dir) = temp_storage();
    storage.set_api_key("sk_live_xyz").unwrap();
    assert!(!storage.get().unwrap().unwrap().is_expired());
}

// ── Bearer + key classification ───────────────────────────────────

#[test]
fn bearer_token_for_each_variant() {
    let (storage, _dir) = temp_storage();

    storage.set_session_tokens(&session_tokens()).unwrap();
    assert_eq!(
        storage.bearer_token().unwrap().unwrap(),
        "cli_access_abc"
    );

    storage.set_api_key("sk_test_abc").unwrap();
    assert_eq!(storage.bearer_token().unwrap().unwrap(), "sk_test_abc");
}

#[test]
fn key_kind_by_prefix() {
    let test = Credential::ApiKey {
        key: "sk_test_abc".to_string(),
    };
    let live = Credential::ApiKey {
        key: "sk_live_abc".to_string(),
    };
    assert_eq!(test.key_kind(), Some(KeyKind::Test));
    assert_eq!(live.key_kind(), Some(KeyKind::Live));
}

#[test]
fn session_tokens_have_no_key_kind() {
    let (storage, _dir) = temp_storage();
    storage.set_session_tokens(&session_tokens()).unwrap();
    assert!(storage.get().unwrap().unwrap().key_kind().is_none());
}

// ── Persistence + JSON format ─────────────────────────────────────

#[test]
fn persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sendly.db");
    let path_str = path.to_str().unwrap();

    {
        let storage = AuthStorage::open(path_str).unwrap();
        storage.set_api_key("sk_test_persisted").unwrap();
    }

    {
        let storage = AuthStorage::open(path_str).unwrap();
        match storage.get().unwrap().unwrap() {
            Credential::ApiKey { key } => assert_eq!(key, "sk_test_persisted"),
            _ => panic!("expected ApiKey"),
        }
    }
}

#[test]
fn stored_json_is_tagged() {
    let (storage, dir) = temp_storage();
    storage.set_session_tokens(&session_tokens()).unwrap();

    let conn = rusqlite::Connection::open(dir.path().join("sendly.db")).unwrap();
    let data: String = conn
        .query_row("SELECT data FROM credential WHERE id = 0", [], |row| {
            row.get(0)
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&data).unwrap();

    assert_eq!(parsed["type"], "session");
    assert_eq!(parsed["access"], "cli_access_abc");
    assert_eq!(parsed["email"], "ada@example.com");
}

#[test]
fn config_and_storage_share_one_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sendly.db");
    let path_str = path.to_str().unwrap();

    let config = Config::open(path_str).unwrap();
    let storage = AuthStorage::open(path_str).unwrap();

    config
        .set_team(&ActiveTeam {
            id: "org_1".to_string(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
        })
        .unwrap();
    storage.set_api_key("sk_test_abc").unwrap();

    assert_eq!(config.team().unwrap().unwrap().id, "org_1");
    assert!(storage.get().unwrap().is_some());
}
