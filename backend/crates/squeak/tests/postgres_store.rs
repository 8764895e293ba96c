//! PostgreSQL store tests
//!
//! Run only when `SQUEAK_TEST_DATABASE_URL` points at a disposable database;
//! the schema is dropped and recreated.

use platform::password::{ClearTextPassword, HashedPassword};
use squeak::models::{Email, NewAccount, Username};
use squeak::{PgSqueakStore, SqueakError, SqueakStore};

async fn store() -> Option<PgSqueakStore> {
    let Ok(url) = std::env::var("SQUEAK_TEST_DATABASE_URL") else {
        eprintln!("SQUEAK_TEST_DATABASE_URL not set, skipping");
        return None;
    };

    let store = PgSqueakStore::connect(&url, 5).await.unwrap();
    store.drop_schema().await.unwrap();
    store.ensure_schema().await.unwrap();
    // Idempotent
    store.ensure_schema().await.unwrap();
    Some(store)
}

fn new_account(username: &str, email: &str, hash: &HashedPassword) -> NewAccount {
    NewAccount {
        username: Username::new(username).unwrap(),
        email: Email::new(email).unwrap(),
        password_hash: hash.clone(),
    }
}

fn name(s: &str) -> Username {
    Username::new(s).unwrap()
}

// One test: every step shares the same tables
#[tokio::test]
async fn test_postgres_store_contract() {
    let Some(store) = store().await else {
        return;
    };

    let hash = ClearTextPassword::without_policy("secret1".to_string())
        .hash(None)
        .unwrap();

    // Ids are 1-based and increasing
    let mark = store
        .create_account(new_account("Mark", "m@example.com", &hash))
        .await
        .unwrap();
    let harrison = store
        .create_account(new_account("Harrison", "h@example.com", &hash))
        .await
        .unwrap();
    assert_eq!(mark.get(), 1);
    assert!(harrison > mark);

    // Lookups round-trip the stored hash
    let found = store.find_by_username(&name("Harrison")).await.unwrap().unwrap();
    assert_eq!(found.id, harrison);
    assert_eq!(found.email.as_str(), "h@example.com");
    assert!(
        found
            .password_hash
            .verify(&ClearTextPassword::without_policy("secret1".to_string()), None)
            .unwrap()
    );
    assert_eq!(
        store.find_by_id(mark).await.unwrap().unwrap().username.as_str(),
        "Mark"
    );
    assert!(store.find_by_username(&name("Luke")).await.unwrap().is_none());

    // Duplicates are rejected without a write
    let err = store
        .create_account(new_account("Mark", "x@example.com", &hash))
        .await
        .unwrap_err();
    assert!(matches!(err, SqueakError::Duplicate(f) if f.username && !f.email));
    let err = store
        .create_account(new_account("Luke", "h@example.com", &hash))
        .await
        .unwrap_err();
    assert!(matches!(err, SqueakError::Duplicate(f) if !f.username && f.email));

    let conflicts = store
        .find_conflicts(&name("Mark"), &Email::new("h@example.com").unwrap())
        .await
        .unwrap();
    assert!(conflicts.username && conflicts.email);

    // Feeds
    assert!(store.list_squeaks(&name("Harrison")).await.unwrap().is_empty());
    assert!(matches!(
        store.list_squeaks(&name("Luke")).await,
        Err(SqueakError::AccountNotFound)
    ));
    assert!(matches!(
        store.append_squeak(&name("Luke"), "hello").await,
        Err(SqueakError::AccountNotFound)
    ));

    for (i, text) in ["a", "b", "c"].into_iter().enumerate() {
        let count = store.append_squeak(&name("Harrison"), text).await.unwrap();
        assert_eq!(count, i as u64 + 1);
    }
    store
        .append_squeak(&name("Mark"), "I don't believe it!")
        .await
        .unwrap();

    let texts: Vec<_> = store
        .list_squeaks(&name("Harrison"))
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(texts, ["a", "b", "c"]);

    let feeds = store.list_accounts_with_squeaks().await.unwrap();
    assert_eq!(feeds.len(), 2);
    assert_eq!(feeds[0].account.username.as_str(), "Mark");
    assert_eq!(feeds[0].squeaks.len(), 1);
    assert_eq!(feeds[1].account.username.as_str(), "Harrison");
    assert_eq!(feeds[1].squeaks.len(), 3);

    // Concurrent appends from the same author never share a count
    let mut handles = Vec::new();
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .append_squeak(&Username::new("Mark").unwrap(), &format!("burst {}", i))
                .await
                .unwrap()
        }));
    }
    let mut counts = Vec::new();
    for handle in handles {
        counts.push(handle.await.unwrap());
    }
    counts.sort_unstable();
    assert_eq!(counts, (2..=11).collect::<Vec<u64>>());

    store.drop_schema().await.unwrap();
    store.close().await;
}
