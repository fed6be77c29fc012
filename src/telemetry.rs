//! Telemetry metric name constants.
//!
//! Centralised metric names for saucier operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `saucier_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `endpoint`: remote endpoint hit ("list", "search", "detail", "flavordb")
//! - `operation`: client operation (e.g. "search_by_title", "recipe_of_the_day")
//! - `status`: outcome: "ok" or "error"

/// Total HTTP requests sent to the remote APIs.
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "saucier_requests_total";

/// Request duration in seconds.
///
/// Labels: `endpoint`.
pub const REQUEST_DURATION_SECONDS: &str = "saucier_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `operation`.
pub const RETRIES_TOTAL: &str = "saucier_retries_total";

/// Total cache store hits.
pub const CACHE_HITS_TOTAL: &str = "saucier_cache_hits_total";

/// Total cache store misses, including expired entries.
pub const CACHE_MISSES_TOTAL: &str = "saucier_cache_misses_total";

/// Total full purges triggered by a storage quota failure.
pub const CACHE_PURGES_TOTAL: &str = "saucier_cache_purges_total";

/// Total callers that attached to an already in-flight request.
///
/// Labels: `operation`.
pub const COALESCED_TOTAL: &str = "saucier_coalesced_requests_total";

/// Total operations answered from static fallback data.
///
/// Labels: `operation`.
pub const FALLBACKS_TOTAL: &str = "saucier_fallbacks_total";
