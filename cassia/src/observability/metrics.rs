//! Session-wide metrics, maintained by the engine and read synchronously.

/// Request latency and connection statistics for one session. Latencies are
/// in microseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMetrics {
    pub requests_min: u64,
    pub requests_max: u64,
    pub requests_mean: u64,
    pub requests_stddev: u64,
    pub requests_median: u64,
    pub requests_percentile_75th: u64,
    pub requests_percentile_95th: u64,
    pub requests_percentile_98th: u64,
    pub requests_percentile_99th: u64,
    pub requests_percentile_999th: u64,

    /// Requests per second, exponentially weighted.
    pub requests_mean_rate: f64,
    pub requests_one_minute_rate: f64,
    pub requests_five_minute_rate: f64,
    pub requests_fifteen_minute_rate: f64,

    pub stats_total_connections: u64,
    pub stats_available_connections: u64,
    pub stats_exceeded_pending_requests_water_mark: u64,
    pub stats_exceeded_write_bytes_water_mark: u64,

    pub errors_connection_timeouts: u64,
    pub errors_pending_request_timeouts: u64,
    pub errors_request_timeouts: u64,

    pub speculative: SpeculativeExecutionMetrics,
}

/// Statistics of speculative executions issued by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeculativeExecutionMetrics {
    pub min: u64,
    pub max: u64,
    pub mean: u64,
    pub median: u64,
    pub percentile_75th: u64,
    pub percentile_95th: u64,
    pub percentile_98th: u64,
    pub percentile_99th: u64,
    pub percentile_999th: u64,
    pub count: u64,
    /// Share of requests that triggered at least one speculative execution.
    pub percentage: f64,
}
