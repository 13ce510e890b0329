use super::*;
use crate::types::{MethodDescriptor, TypeKind};
use rayon::prelude::*;
use std::sync::atomic::AtomicUsize;
use std::sync::{Barrier, Mutex};
use std::thread;

fn descriptor(name: &str) -> TypeDescriptor {
    TypeDescriptor::new(name, TypeKind::Interface).with_method(MethodDescriptor::new("render"))
}

#[test]
fn test_builds_once_then_hits() {
    let cache = DescriptorCache::new();
    let builds = AtomicUsize::new(0);

    for _ in 0..3 {
        let result: Result<_, ()> = cache.get_or_try_insert_with("Renderable", || {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(descriptor("Renderable"))
        });
        assert_eq!(result.unwrap().type_name, "Renderable");
    }

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 2,
            misses: 1,
            entries: 1
        }
    );
}

#[test]
fn test_same_arc_is_returned() {
    let cache = DescriptorCache::new();
    let first = cache
        .get_or_try_insert_with::<()>("A", || Ok(descriptor("A")))
        .unwrap();
    let second = cache
        .get_or_try_insert_with::<()>("A", || Ok(descriptor("ignored")))
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.type_name, "A");
}

#[test]
fn test_failed_build_is_not_cached() {
    let cache = DescriptorCache::new();

    let err = cache.get_or_try_insert_with("Broken", || Err("boom"));
    assert_eq!(err.unwrap_err(), "boom");
    assert!(!cache.contains("Broken"));
    assert!(cache.is_empty());

    let ok = cache.get_or_try_insert_with::<&str>("Broken", || Ok(descriptor("Broken")));
    assert!(ok.is_ok());
    assert_eq!(cache.len(), 1);
    assert!(cache.get("Broken").is_some());
}

#[test]
fn test_concurrent_first_build_happens_once() {
    let cache = Arc::new(DescriptorCache::new());
    let builds = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let num_threads = 8;
    let barrier = Arc::new(Barrier::new(num_threads));

    let mut handles = vec![];
    for _ in 0..num_threads {
        let cache = Arc::clone(&cache);
        let builds = Arc::clone(&builds);
        let seen = Arc::clone(&seen);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let found = cache
                .get_or_try_insert_with::<()>("Shared", || {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(descriptor("Shared"))
                })
                .unwrap();
            seen.lock().unwrap().push(found);
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), num_threads);
    assert!(seen.iter().all(|d| Arc::ptr_eq(d, &seen[0])));
    assert_eq!(cache.stats().hits, (num_threads - 1) as u64);
}

#[test]
fn test_parallel_distinct_names() {
    let cache = DescriptorCache::new();
    let names: Vec<String> = (0..64).map(|i| format!("Type{}", i % 16)).collect();

    names.par_iter().for_each(|name| {
        let found = cache
            .get_or_try_insert_with::<()>(name, || Ok(descriptor(name)))
            .unwrap();
        assert_eq!(&found.type_name, name);
    });

    let stats = cache.stats();
    assert_eq!(stats.entries, 16);
    assert_eq!(stats.misses, 16);
    assert_eq!(stats.hits, 48);
}
