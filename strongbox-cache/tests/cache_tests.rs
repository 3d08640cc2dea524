use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use strongbox_cache::{
    CacheBackend, CacheError, CacheResult, FileBackend, MemoryBackend, SecretCache, SqliteBackend,
};
use strongbox_crypto::{decrypt, derive_key, encrypt};
use strongbox_types::*;

fn test_bundle() -> SecretBundle {
    SecretBundle {
        login_password: vec![LoginPassword {
            login: "admin".into(),
            password: "pass".into(),
            label: "work".into(),
        }],
        text_secret: vec![TextSecret {
            title: "note".into(),
            body: "hello".into(),
        }],
        binary_secret: vec![BinarySecret::from_bytes(
            "key.bin",
            "application/octet-stream",
            &[0, 1, 2, 3],
        )],
        card_secret: vec![CardSecret {
            cardholder: "J DOE".into(),
            pan: "4111111111111111".into(),
            exp_month: "12".into(),
            exp_year: "2030".into(),
            brand: "visa".into(),
            last4: "1111".into(),
        }],
    }
}

fn memory_cache(passphrase: &str) -> (SecretCache, MemoryBackend) {
    let backend = MemoryBackend::new();
    let cache = SecretCache::new(derive_key(passphrase), backend.clone());
    cache.load().unwrap();
    (cache, backend)
}

// ── Basic operations ──

#[test]
fn empty_cache_returns_none() {
    let (cache, _) = memory_cache("k");
    assert!(cache.get().is_none());
    assert!(!cache.is_wrong_key());
}

#[test]
fn set_then_get() {
    let (cache, _) = memory_cache("k");
    cache.set(test_bundle()).unwrap();

    let got = cache.get().unwrap();
    assert_eq!(*got, test_bundle());
}

#[test]
fn set_overwrites_previous_bundle() {
    let (cache, backend) = memory_cache("k");
    cache.set(test_bundle()).unwrap();
    cache.set(SecretBundle::default()).unwrap();

    assert_eq!(*cache.get().unwrap(), SecretBundle::default());

    let reopened = SecretCache::new(derive_key("k"), backend);
    reopened.load().unwrap();
    assert_eq!(*reopened.get().unwrap(), SecretBundle::default());
}

#[test]
fn empty_bundle_is_distinct_from_absent() {
    let (cache, backend) = memory_cache("k");
    cache.set(SecretBundle::default()).unwrap();

    assert!(cache.get().is_some());
    assert!(backend.snapshot().is_some());
}

#[test]
fn persisted_entry_is_encrypted_bundle() {
    let (cache, backend) = memory_cache("k");
    cache.set(test_bundle()).unwrap();

    let raw = backend.snapshot().unwrap();
    assert!(!String::from_utf8_lossy(&raw).contains("admin"));

    let plaintext = decrypt(&derive_key("k"), &raw).unwrap();
    let decoded: SecretBundle = serde_json::from_slice(&plaintext).unwrap();
    assert_eq!(decoded, test_bundle());
}

#[test]
fn each_set_uses_fresh_nonce() {
    let (cache, backend) = memory_cache("k");
    cache.set(test_bundle()).unwrap();
    let first = backend.snapshot().unwrap();
    cache.set(test_bundle()).unwrap();
    let second = backend.snapshot().unwrap();
    assert_ne!(first, second);
}

// ── Reset ──

#[test]
fn reset_clears_memory_and_storage() {
    let (cache, backend) = memory_cache("k");
    cache.set(test_bundle()).unwrap();
    cache.reset().unwrap();

    assert!(cache.get().is_none());
    assert!(backend.snapshot().is_none());
}

#[test]
fn reset_is_idempotent() {
    let (cache, _) = memory_cache("k");
    cache.reset().unwrap();
    cache.reset().unwrap();
    assert!(cache.get().is_none());
}

// ── Load ──

#[test]
fn reopen_with_same_key_restores_bundle() {
    let (cache, backend) = memory_cache("k");
    cache.set(test_bundle()).unwrap();
    cache.close().unwrap();

    let reopened = SecretCache::new(derive_key("k"), backend);
    reopened.load().unwrap();
    assert_eq!(*reopened.get().unwrap(), test_bundle());
    assert!(!reopened.is_wrong_key());
}

#[test]
fn load_with_wrong_key_sets_flag_and_stays_empty() {
    let (cache, backend) = memory_cache("k1");
    cache.set(test_bundle()).unwrap();

    let other = SecretCache::new(derive_key("k2"), backend);
    other.load().unwrap();
    assert!(other.get().is_none());
    assert!(other.is_wrong_key());
}

#[test]
fn wrong_key_flag_survives_later_set_and_reset() {
    let (cache, backend) = memory_cache("k1");
    cache.set(test_bundle()).unwrap();

    let other = SecretCache::new(derive_key("k2"), backend);
    other.load().unwrap();
    other.reset().unwrap();
    other.set(test_bundle()).unwrap();

    assert!(other.is_wrong_key());
    assert_eq!(*other.get().unwrap(), test_bundle());
}

#[test]
fn wrong_key_cache_can_be_repopulated_under_new_key() {
    let (cache, backend) = memory_cache("k1");
    cache.set(test_bundle()).unwrap();

    let other = SecretCache::new(derive_key("k2"), backend.clone());
    other.load().unwrap();
    other.reset().unwrap();
    other.set(test_bundle()).unwrap();

    let third = SecretCache::new(derive_key("k2"), backend);
    third.load().unwrap();
    assert!(!third.is_wrong_key());
    assert_eq!(*third.get().unwrap(), test_bundle());
}

#[test]
fn malformed_json_is_treated_as_empty() {
    let backend = MemoryBackend::new();
    let key = derive_key("k");
    backend.put_raw(encrypt(&key, b"{not json").unwrap());

    let cache = SecretCache::new(key, backend);
    cache.load().unwrap();
    assert!(cache.get().is_none());
    assert!(!cache.is_wrong_key());
}

#[test]
fn short_entry_is_treated_as_empty() {
    let backend = MemoryBackend::new();
    backend.put_raw(vec![1, 2, 3]);

    let cache = SecretCache::new(derive_key("k"), backend);
    cache.load().unwrap();
    assert!(cache.get().is_none());
    assert!(!cache.is_wrong_key());
}

#[test]
fn tampered_entry_reports_wrong_key() {
    let (cache, backend) = memory_cache("k");
    cache.set(test_bundle()).unwrap();
    let mut raw = backend.snapshot().unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;
    backend.put_raw(raw);

    let reopened = SecretCache::new(derive_key("k"), backend);
    reopened.load().unwrap();
    assert!(reopened.get().is_none());
    assert!(reopened.is_wrong_key());
}

// ── Close ──

#[test]
fn close_is_idempotent() {
    let (cache, _) = memory_cache("k");
    cache.close().unwrap();
    cache.close().unwrap();
    assert!(cache.is_closed());
}

#[test]
fn set_after_close_updates_memory_but_errors() {
    let (cache, backend) = memory_cache("k");
    cache.close().unwrap();

    let err = cache.set(test_bundle()).unwrap_err();
    assert!(matches!(err, CacheError::Closed));
    assert_eq!(*cache.get().unwrap(), test_bundle());
    assert!(backend.snapshot().is_none());
}

#[test]
fn load_after_close_errors() {
    let (cache, _) = memory_cache("k");
    cache.close().unwrap();
    assert!(matches!(cache.load().unwrap_err(), CacheError::Closed));
}

// ── Persistence failures ──

struct FailingBackend;

impl CacheBackend for FailingBackend {
    fn read(&mut self) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn replace(&mut self, _entry: &[u8]) -> CacheResult<()> {
        Err(std::io::Error::other("disk full").into())
    }

    fn clear(&mut self) -> CacheResult<()> {
        Err(std::io::Error::other("read-only").into())
    }
}

#[test]
fn failed_persist_keeps_in_memory_value() {
    let cache = SecretCache::new(derive_key("k"), FailingBackend);
    cache.load().unwrap();

    let err = cache.set(test_bundle()).unwrap_err();
    assert!(matches!(err, CacheError::Io(_)));
    assert_eq!(*cache.get().unwrap(), test_bundle());
}

#[test]
fn failed_clear_still_drops_memory() {
    let cache = SecretCache::new(derive_key("k"), FailingBackend);
    let _ = cache.set(test_bundle());

    assert!(cache.reset().is_err());
    assert!(cache.get().is_none());
}

// ── Real backends ──

#[test]
fn sqlite_cache_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let cache = SecretCache::open(&path, derive_key("k")).unwrap();
    assert!(cache.get().is_none());
    cache.set(test_bundle()).unwrap();
    cache.close().unwrap();

    let reopened = SecretCache::open(&path, derive_key("k")).unwrap();
    assert_eq!(*reopened.get().unwrap(), test_bundle());
}

#[test]
fn sqlite_cache_wrong_key_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let cache = SecretCache::open(&path, derive_key("k1")).unwrap();
    cache.set(test_bundle()).unwrap();
    cache.close().unwrap();

    let reopened = SecretCache::open(&path, derive_key("k2")).unwrap();
    assert!(reopened.get().is_none());
    assert!(reopened.is_wrong_key());
}

#[test]
fn sqlite_reset_then_reopen_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let cache = SecretCache::open(&path, derive_key("k")).unwrap();
    cache.set(test_bundle()).unwrap();
    cache.reset().unwrap();
    cache.close().unwrap();

    let reopened = SecretCache::open(&path, derive_key("k")).unwrap();
    assert!(reopened.get().is_none());
    assert!(!reopened.is_wrong_key());
}

#[test]
fn file_cache_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.bin");

    let cache = SecretCache::new(derive_key("k"), FileBackend::new(&path));
    cache.load().unwrap();
    cache.set(test_bundle()).unwrap();
    assert!(path.exists());

    let reopened = SecretCache::new(derive_key("k"), FileBackend::new(&path));
    reopened.load().unwrap();
    assert_eq!(*reopened.get().unwrap(), test_bundle());

    reopened.reset().unwrap();
    assert!(!path.exists());
}

#[test]
fn in_memory_sqlite_backend_works() {
    let cache = SecretCache::new(derive_key("k"), SqliteBackend::open_in_memory().unwrap());
    cache.load().unwrap();
    cache.set(test_bundle()).unwrap();
    cache.load().unwrap();
    assert_eq!(*cache.get().unwrap(), test_bundle());
}

// ── Concurrency ──

#[test]
fn concurrent_readers_and_writers() {
    let (cache, _) = memory_cache("k");
    let cache = Arc::new(cache);
    cache.set(test_bundle()).unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                if i % 2 == 0 {
                    if let Some(bundle) = cache.get() {
                        assert!(bundle.len() == 4 || bundle.is_empty());
                    }
                } else {
                    cache.set(test_bundle()).unwrap();
                    cache.reset().unwrap();
                    cache.set(SecretBundle::default()).unwrap();
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}
