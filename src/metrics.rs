// Lock-free metrics using atomic counters
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

static CONNECTIONS_TOTAL: AtomicU64 = AtomicU64::new(0);
static REQUESTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static REQUESTS_OK: AtomicU64 = AtomicU64::new(0);
static REQUESTS_ERR: AtomicU64 = AtomicU64::new(0);
static BYTES_IN: AtomicU64 = AtomicU64::new(0);
static BYTES_OUT: AtomicU64 = AtomicU64::new(0);

pub fn init() {
    START_TIME.get_or_init(Instant::now);
}

#[inline]
pub fn inc_connections() { CONNECTIONS_TOTAL.fetch_add(1, Ordering::Relaxed); }

#[inline]
pub fn inc_requests() { REQUESTS_TOTAL.fetch_add(1, Ordering::Relaxed); }

#[inline]
pub fn inc_requests_ok() { REQUESTS_OK.fetch_add(1, Ordering::Relaxed); }

#[inline]
pub fn inc_requests_err() { REQUESTS_ERR.fetch_add(1, Ordering::Relaxed); }

#[inline]
pub fn add_bytes_in(n: u64) { BYTES_IN.fetch_add(n, Ordering::Relaxed); }

#[inline]
pub fn add_bytes_out(n: u64) { BYTES_OUT.fetch_add(n, Ordering::Relaxed); }

/// One-line counter summary, logged at shutdown.
pub fn summary() -> String {
    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);
    let conns = CONNECTIONS_TOTAL.load(Ordering::Relaxed);
    let total = REQUESTS_TOTAL.load(Ordering::Relaxed);
    let ok = REQUESTS_OK.load(Ordering::Relaxed);
    let err = REQUESTS_ERR.load(Ordering::Relaxed);
    let b_in = BYTES_IN.load(Ordering::Relaxed);
    let b_out = BYTES_OUT.load(Ordering::Relaxed);
    format!(
        "uptime={uptime}s connections={conns} requests={total} ok={ok} err={err} bytes_in={b_in} bytes_out={b_out}"
    )
}
