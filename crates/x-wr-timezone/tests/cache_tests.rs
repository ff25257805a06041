//! Tests for the per-zone VTIMEZONE cache.

use std::sync::Arc;
use std::thread;

use chrono_tz::Tz;
use x_wr_timezone::cache::TimezoneCache;
use x_wr_timezone::vtimezone::{build_vtimezone, VTimezoneWindow};

#[test]
fn same_zone_yields_the_same_block() {
    let cache = TimezoneCache::new();
    assert!(cache.is_empty());

    let first = cache.get_or_build(Tz::Europe__Berlin);
    let second = cache.get_or_build(Tz::Europe__Berlin);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn different_zones_yield_different_blocks() {
    let cache = TimezoneCache::new();
    let berlin = cache.get_or_build(Tz::Europe__Berlin);
    let tokyo = cache.get_or_build(Tz::Asia__Tokyo);

    assert_ne!(berlin, tokyo);
    assert_eq!(cache.len(), 2);
}

#[test]
fn cached_block_matches_a_fresh_build() {
    let window = VTimezoneWindow::new(2015, 2025);
    let cache = TimezoneCache::with_window(window);

    assert_eq!(cache.window(), window);
    assert_eq!(
        *cache.get_or_build(Tz::America__New_York),
        build_vtimezone(Tz::America__New_York, &window)
    );
}

#[test]
fn reset_forgets_built_blocks() {
    let cache = TimezoneCache::new();
    let before = cache.get_or_build(Tz::Asia__Tokyo);

    cache.reset();
    assert!(cache.is_empty());

    let after = cache.get_or_build(Tz::Asia__Tokyo);
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before, after);
}

#[test]
fn concurrent_requests_share_one_block() {
    let cache = TimezoneCache::new();

    let blocks: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| cache.get_or_build(Tz::Australia__Sydney)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.len(), 1);
    for block in &blocks[1..] {
        assert!(Arc::ptr_eq(&blocks[0], block));
    }
}
