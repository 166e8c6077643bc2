//! Behavior every backend implementation must share.
//!
//! Each check starts from a flushed cache so the functions can run in any
//! order against one backend.

#![allow(dead_code)]

use std::collections::HashSet;
use std::time::Duration;
use tagged_cache::{FreezableBackend, IterableBackend, TaggableBackend};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn set_of(items: &[&str]) -> HashSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Identifiers currently recorded under `tag`.
pub async fn tagged<B: TaggableBackend>(backend: &B, tag: &str) -> HashSet<String> {
    backend
        .find_identifiers_by_tag(tag)
        .await
        .expect("Failed to find")
}

async fn reset<B: FreezableBackend>(backend: &B) {
    backend.flush().await.expect("Failed to flush");
    assert!(!backend.is_frozen().await.expect("Failed to check frozen"));
}

pub async fn round_trip<B: TaggableBackend + FreezableBackend>(backend: &B) {
    reset(backend).await;

    let forever = Some(Duration::ZERO);
    backend
        .set("page", b"<html>".to_vec(), &["layout", "nav"], forever)
        .await
        .expect("Failed to set");

    assert_eq!(
        backend.get("page").await.expect("Failed to get"),
        Some(b"<html>".to_vec())
    );
    assert!(backend.has("page").await.expect("Failed to check"));
    for tag in ["layout", "nav"] {
        assert!(tagged(backend, tag).await.contains("page"));
    }

    assert_eq!(backend.get("missing").await.expect("Failed to get"), None);
    assert!(!backend.has("missing").await.expect("Failed to check"));
}

pub async fn overwrite_replaces_data_and_tags<B: TaggableBackend + FreezableBackend>(backend: &B) {
    reset(backend).await;

    backend
        .set("page", b"v1".to_vec(), &["red", "blue"], None)
        .await
        .expect("Failed to set");
    backend
        .set("page", b"v2".to_vec(), &["blue"], None)
        .await
        .expect("Failed to set");

    assert_eq!(
        backend.get("page").await.expect("Failed to get"),
        Some(b"v2".to_vec())
    );
    assert!(tagged(backend, "red").await.is_empty());
    assert_eq!(tagged(backend, "blue").await, set_of(&["page"]));
}

pub async fn flush_by_tag_scenario<B: TaggableBackend + FreezableBackend>(backend: &B) {
    reset(backend).await;

    backend
        .set("a", b"v1".to_vec(), &["red"], Some(Duration::ZERO))
        .await
        .expect("Failed to set");
    backend
        .set("b", b"v2".to_vec(), &["red", "blue"], Some(Duration::ZERO))
        .await
        .expect("Failed to set");
    backend
        .set("c", b"v3".to_vec(), &["green"], Some(Duration::ZERO))
        .await
        .expect("Failed to set");

    assert_eq!(tagged(backend, "red").await, set_of(&["a", "b"]));

    let flushed = backend.flush_by_tag("red").await.expect("Failed to flush");
    assert_eq!(flushed, 2);

    assert!(!backend.has("a").await.expect("Failed to check"));
    assert!(!backend.has("b").await.expect("Failed to check"));
    assert!(tagged(backend, "blue").await.is_empty());
    assert!(tagged(backend, "red").await.is_empty());

    // Entries without the tag survive.
    assert_eq!(
        backend.get("c").await.expect("Failed to get"),
        Some(b"v3".to_vec())
    );
    assert_eq!(tagged(backend, "green").await, set_of(&["c"]));

    let flushed = backend.flush_by_tag("unused").await;
    assert_eq!(flushed.expect("Failed to flush"), 0);
}

pub async fn removal_completeness<B: TaggableBackend + FreezableBackend>(backend: &B) {
    reset(backend).await;

    backend
        .set("a", b"1".to_vec(), &["red", "blue"], None)
        .await
        .expect("Failed to set");
    backend
        .set("b", b"2".to_vec(), &["red"], None)
        .await
        .expect("Failed to set");

    assert!(backend.remove("a").await.expect("Failed to remove"));

    assert!(!backend.has("a").await.expect("Failed to check"));
    assert_eq!(tagged(backend, "red").await, set_of(&["b"]));
    assert!(tagged(backend, "blue").await.is_empty());

    // Removing an absent entry still reports success.
    assert!(backend.remove("a").await.expect("Failed to remove"));
}

pub async fn flush_clears_everything<B: TaggableBackend + FreezableBackend>(backend: &B) {
    reset(backend).await;

    backend
        .set("a", b"1".to_vec(), &["red"], None)
        .await
        .expect("Failed to set");
    backend
        .set("b", b"2".to_vec(), &["blue"], None)
        .await
        .expect("Failed to set");
    backend.freeze().await.expect("Failed to freeze");

    backend.flush().await.expect("Failed to flush");

    assert!(!backend.has("a").await.expect("Failed to check"));
    assert!(!backend.has("b").await.expect("Failed to check"));
    for tag in ["red", "blue"] {
        assert!(tagged(backend, tag).await.is_empty());
    }
    assert!(!backend.is_frozen().await.expect("Failed to check frozen"));

    // Flushing an empty cache is fine.
    backend.flush().await.expect("Failed to flush");
}

pub async fn freeze_rejects_mutations<B: TaggableBackend + FreezableBackend>(backend: &B) {
    reset(backend).await;

    backend
        .set("a", b"1".to_vec(), &["red"], None)
        .await
        .expect("Failed to set");
    backend.freeze().await.expect("Failed to freeze");
    assert!(backend.is_frozen().await.expect("Failed to check frozen"));

    let set = backend.set("b", b"2".to_vec(), &[], None).await;
    assert!(set.expect_err("set must fail when frozen").is_frozen());
    let remove = backend.remove("a").await;
    assert!(remove.expect_err("remove must fail").is_frozen());
    let flush_by_tag = backend.flush_by_tag("red").await;
    assert!(flush_by_tag
        .expect_err("flush_by_tag must fail when frozen")
        .is_frozen());
    let freeze = backend.freeze().await;
    assert!(freeze.expect_err("freeze must fail").is_frozen());

    // Reads keep working.
    assert_eq!(
        backend.get("a").await.expect("Failed to get"),
        Some(b"1".to_vec())
    );
    assert!(backend.has("a").await.expect("Failed to check"));
    assert_eq!(tagged(backend, "red").await, set_of(&["a"]));

    backend.flush().await.expect("Failed to flush");
    assert!(!backend.is_frozen().await.expect("Failed to check frozen"));
    backend
        .set("b", b"2".to_vec(), &[], None)
        .await
        .expect("set must succeed after flush");
}

/// Walk the cursor to exhaustion, collecting identifiers and data.
pub async fn collect<B: IterableBackend>(backend: &mut B) -> Vec<(String, Option<Vec<u8>>)> {
    let mut seen = Vec::new();
    backend.rewind();
    while backend.valid().await.expect("Failed to check cursor") {
        let key = backend
            .key()
            .await
            .expect("Failed to read key")
            .expect("valid cursor has a key");
        let current = backend.current().await.expect("Failed to read current");
        seen.push((key, current));
        backend.next();
    }
    seen
}

pub async fn iteration_is_restartable<B>(backend: &mut B)
where
    B: IterableBackend + TaggableBackend + FreezableBackend,
{
    reset(backend).await;

    for (identifier, data) in [("a", "1"), ("b", "2"), ("c", "3")] {
        backend
            .set(identifier, data.as_bytes().to_vec(), &[], None)
            .await
            .expect("Failed to set");
    }

    backend.rewind();
    assert_eq!(
        backend.key().await.expect("Failed to read key"),
        Some("a".to_string())
    );
    backend.next();
    assert_eq!(
        backend.current().await.expect("Failed to read current"),
        Some(b"2".to_vec())
    );

    // Rewind mid-iteration.
    backend.rewind();
    assert_eq!(
        backend.key().await.expect("Failed to read key"),
        Some("a".to_string())
    );

    let first = collect(backend).await;
    let second = collect(backend).await;
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            ("a".to_string(), Some(b"1".to_vec())),
            ("b".to_string(), Some(b"2".to_vec())),
            ("c".to_string(), Some(b"3".to_vec())),
        ]
    );
    assert!(!backend.valid().await.expect("Failed to check cursor"));
}

pub async fn stale_identifiers_after_flush_by_tag<B>(backend: &mut B)
where
    B: IterableBackend + TaggableBackend + FreezableBackend,
{
    reset(backend).await;

    backend
        .set("a", b"1".to_vec(), &["red"], None)
        .await
        .expect("Failed to set");
    backend
        .set("b", b"2".to_vec(), &[], None)
        .await
        .expect("Failed to set");
    backend.flush_by_tag("red").await.expect("Failed to flush");

    assert_eq!(
        collect(backend).await,
        vec![("a".to_string(), None), ("b".to_string(), Some(b"2".to_vec()))]
    );

    assert_eq!(backend.collect_garbage().await.expect("Failed to gc"), 1);
    assert_eq!(
        collect(backend).await,
        vec![("b".to_string(), Some(b"2".to_vec()))]
    );
}

pub async fn duplicate_sets_are_removed_together<B>(backend: &mut B)
where
    B: IterableBackend + TaggableBackend + FreezableBackend,
{
    reset(backend).await;

    backend
        .set("a", b"1".to_vec(), &[], None)
        .await
        .expect("Failed to set");
    backend
        .set("a", b"2".to_vec(), &[], None)
        .await
        .expect("Failed to set");
    assert_eq!(collect(backend).await.len(), 2);

    backend.remove("a").await.expect("Failed to remove");
    assert!(collect(backend).await.is_empty());
}
