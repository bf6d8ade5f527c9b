use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("exam_relay_requests_total", "Total number of exam requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("exam_relay_rate_limited_total", "Requests refused by the rate limiter").unwrap();
    pub static ref PROVIDER_FAILURES: Counter =
        register_counter!("exam_relay_provider_failures_total", "Failed provider calls").unwrap();
    pub static ref RELAY_LATENCY: Histogram = register_histogram!(
        "exam_relay_provider_latency_seconds",
        "Provider call latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_KEYS: Gauge =
        register_gauge!("exam_relay_rate_limit_keys", "Keys currently held by the rate limiter").unwrap();
}

// Render everything registered in the default registry
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
