use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, register_counter, register_gauge};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("noaas_requests_total", "Total number of requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("noaas_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref REASONS_SERVED: Counter =
        register_counter!("noaas_reasons_served_total", "Reasons delivered to clients").unwrap();
    pub static ref REASON_LOADS: Counter =
        register_counter!("noaas_reason_loads_total", "Reason lists read from disk").unwrap();
    pub static ref REASON_LOAD_ERRORS: Counter =
        register_counter!("noaas_reason_load_errors_total", "Failed reason list loads").unwrap();
    pub static ref CACHED_LANGUAGES: Gauge =
        register_gauge!("noaas_cached_languages", "Languages currently held in memory").unwrap();
    pub static ref TRACKED_CLIENTS: Gauge =
        register_gauge!("noaas_tracked_clients", "Clients with a rate limit window").unwrap();
}
