//! Structured query tracing for checker entry points.
//!
//! Events use [`QUERY_TARGET`] and are intended to be consumed with:
//! `DUCKTYPE_LOG=queries DUCKTYPE_LOG_FORMAT=json`.
//!
//! Environment:
//! - `DUCKTYPE_QUERY_RUN_ID`: optional run identifier attached to every event.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

use super::QUERY_TARGET;

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: QUERY_TARGET, Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| {
            std::env::var("DUCKTYPE_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string())
        })
        .as_str()
}

#[inline]
pub(crate) fn check_start(query_id: u64, op: &'static str, candidate: &str, contract: &str) {
    trace!(
        target: QUERY_TARGET,
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        candidate,
        contract
    );
}

#[inline]
pub(crate) fn check_end(query_id: u64, op: &'static str, violations: usize, conforms: bool) {
    trace!(
        target: QUERY_TARGET,
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        violations,
        conforms
    );
}

#[inline]
pub(crate) fn cache_probe(type_name: &str, cache_hit: bool) {
    trace!(
        target: QUERY_TARGET,
        event = "cache",
        run_id = run_id(),
        type_name,
        cache_hit
    );
}
