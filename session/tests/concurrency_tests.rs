//! Concurrency integration tests.
//!
//! The store is shared across request handlers; these tests hammer a single
//! table from many threads and tasks and check that no session is lost,
//! duplicated or resurrected.

use chrono::Duration;
use schoolpulse_testing::test_store;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_creates_issue_unique_tokens() {
    let (store, _clock) = test_store();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = store.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..50)
                    .map(|i| {
                        store
                            .create_session(&format!("parent-{worker}-{i}"), ["stu1"])
                            .expect("create should succeed")
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut tokens = HashSet::new();
    for handle in handles {
        for token in handle.join().expect("worker panicked") {
            assert!(tokens.insert(token), "duplicate token issued");
        }
    }

    assert_eq!(tokens.len(), 400);
    assert_eq!(store.active_session_count(), 400);
}

#[test]
fn test_expired_session_never_reappears_under_contention() {
    let (store, clock) = test_store();
    let token = store.create_session("parent1", ["stu1"]).expect("create");

    clock.advance(Duration::minutes(31));

    let barrier = Arc::new(Barrier::new(6));
    let handles: Vec<_> = (0..6)
        .map(|worker| {
            let store = store.clone();
            let token = token.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                if worker % 2 == 0 {
                    store.refresh_session(token.as_str())
                } else {
                    store.validate_session(token.as_str()).is_some()
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(!handle.join().expect("worker panicked"));
    }

    assert_eq!(store.stored_session_count(), 0);
    assert!(store.peek_session(token.as_str()).is_none());
}

#[test]
fn test_concurrent_logout_reports_removal_once() {
    let (store, _clock) = test_store();
    let token = store.create_session("parent1", ["stu1"]).expect("create");
    let barrier = Arc::new(Barrier::new(10));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            let token = token.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.logout(token.as_str())
            })
        })
        .collect();

    let removals = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .filter(|removed| *removed)
        .count();

    assert_eq!(removals, 1);
}

#[tokio::test]
async fn test_store_is_shareable_across_tasks() {
    let (store, _clock) = test_store();
    let token = store.create_session("parent1", ["stu1"]).expect("create");

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let token = token.clone();
            tokio::spawn(async move {
                assert!(store.refresh_session(token.as_str()));
                store.validate_session(token.as_str()).is_some()
            })
        })
        .collect();

    for task in tasks {
        assert!(task.await.expect("task panicked"));
    }

    assert_eq!(store.get_remaining_minutes(token.as_str()), Some(30));
}
