use std::net::IpAddr;
use std::sync::Arc;
use crate::rate_limit::RateLimiter;
use crate::reasons::ReasonStore;

// app's shared state

pub struct AppState {
    pub reasons: ReasonStore,
    pub limiter: Arc<RateLimiter>,
    pub default_language: String,
    pub trusted_proxies: Vec<IpAddr>, // peers whose forwarding headers we believe
}
